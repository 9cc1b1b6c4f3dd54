//! Case- and separator-insensitive view over a raw backend JSON object.

use hms_types::RecordId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Normalise a backend key: keep ASCII alphanumerics only, lower-cased.
///
/// `doctorID`, `DoctorID`, `doctor_id` and `doctor-id` all become `doctorid`.
pub fn normalise_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A backend object with normalised keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFields {
    fields: BTreeMap<String, Value>,
}

impl RawFields {
    /// Build from a JSON value. Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut fields: BTreeMap<String, Value> = BTreeMap::new();
        for (key, value) in map {
            let key = normalise_key(&key);
            match fields.get(&key) {
                // A populated spelling beats a null one; otherwise first seen wins.
                Some(existing) if !existing.is_null() => {}
                _ => {
                    fields.insert(key, value);
                }
            }
        }
        Self { fields }
    }

    /// First of `names` holding a scalar, coerced to text. `names` must be normalised.
    pub fn text(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find_map(scalar_text)
    }

    /// Like [`RawFields::text`] but also treats empty strings as absent.
    pub fn non_empty_text(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .filter_map(scalar_text)
            .find(|s| !s.is_empty())
    }

    /// First of `names` holding a scalar, as an id. Empty when none is present.
    pub fn id(&self, names: &[&str]) -> RecordId {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find_map(scalar_id)
            .unwrap_or_default()
    }

    /// A nested object such as `doctor: { id, name }`.
    pub fn nested(&self, name: &str) -> Option<RawFields> {
        match self.fields.get(name) {
            Some(Value::Object(map)) => Some(Self::from_map(map.clone())),
            _ => None,
        }
    }

    /// Id from the flat `names`, falling back to `id` inside the nested `object`.
    pub fn id_or_nested(&self, names: &[&str], object: &str) -> RecordId {
        let id = self.id(names);
        if !id.is_empty() {
            return id;
        }
        self.nested(object)
            .map(|nested| nested.id(&["id"]))
            .unwrap_or_default()
    }

    /// Text from the flat `names`, falling back to a name field inside `object`.
    pub fn text_or_nested(&self, names: &[&str], object: &str) -> Option<String> {
        self.non_empty_text(names).or_else(|| {
            self.nested(object)
                .and_then(|nested| nested.non_empty_text(&["name", "fullname", "username"]))
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(_) => scalar_id(value).map(|id| id.as_str().to_owned()),
        _ => None,
    }
}

fn scalar_id(value: &Value) -> Option<RecordId> {
    match value {
        Value::String(s) => Some(RecordId::from(s.as_str())),
        Value::Bool(b) => Some(RecordId::new(b.to_string())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(RecordId::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(RecordId::from(u))
            } else {
                n.as_f64().map(RecordId::from_f64)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawFields {
        RawFields::from_value(value).expect("object")
    }

    #[test]
    fn normalises_casing_and_separators() {
        assert_eq!(normalise_key("doctorID"), "doctorid");
        assert_eq!(normalise_key("DoctorID"), "doctorid");
        assert_eq!(normalise_key("doctor_id"), "doctorid");
        assert_eq!(normalise_key("_id"), "id");
    }

    #[test]
    fn resolves_any_spelling() {
        let fields = raw(json!({"DoctorID": 12}));
        assert_eq!(fields.id(&["doctorid"]).as_str(), "12");
    }

    #[test]
    fn populated_spelling_beats_null() {
        let fields = raw(json!({"DoctorID": null, "doctorID": 4}));
        assert_eq!(fields.id(&["doctorid"]).as_str(), "4");
    }

    #[test]
    fn objects_and_arrays_are_not_text() {
        let fields = raw(json!({"reason": {"code": 1}, "notes": ["a"]}));
        assert_eq!(fields.text(&["reason"]), None);
        assert_eq!(fields.text(&["notes"]), None);
    }

    #[test]
    fn falls_back_to_nested_objects() {
        let fields = raw(json!({"doctor": {"ID": 3, "Name": "Dr Grey"}}));
        assert_eq!(fields.id_or_nested(&["doctorid"], "doctor").as_str(), "3");
        assert_eq!(
            fields.text_or_nested(&["doctorname"], "doctor").as_deref(),
            Some("Dr Grey")
        );
    }

    #[test]
    fn missing_fields_are_absent() {
        let fields = raw(json!({}));
        assert!(fields.id(&["id"]).is_empty());
        assert_eq!(fields.text(&["status"]), None);
        assert!(RawFields::from_value(json!([1, 2])).is_none());
    }
}
