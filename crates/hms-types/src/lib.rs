use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so
/// `" Pending "` and `"Pending"` produce the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against an arbitrary string.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NonEmptyText::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Opaque record identifier.
///
/// Backends disagree on whether ids are numbers or strings, so every id is held in its
/// string form. Numbers are coerced the way a browser would print them: `1`, `1.0` and
/// `"1"` all become `"1"`. An empty id means "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Coerce a floating point number into its id form.
    pub fn from_f64(value: f64) -> Self {
        Self(float_text(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Render a float without a trailing `.0` when it holds an integral value.
fn float_text(value: f64) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

struct RecordIdVisitor;

impl<'de> serde::de::Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null identifier")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<RecordId, E> {
        Ok(RecordId::from(v))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<RecordId, E> {
        Ok(RecordId(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<RecordId, E> {
        Ok(RecordId::from(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<RecordId, E> {
        Ok(RecordId::from(v))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<RecordId, E> {
        Ok(RecordId::from_f64(v))
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<RecordId, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<RecordId, E> {
        Ok(RecordId::default())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<RecordId, E> {
        Ok(RecordId::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<RecordId, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let text = NonEmptyText::new("  Pending ").expect("valid text");
        assert_eq!(text.as_str(), "Pending");
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn non_empty_text_compares_case_insensitively() {
        let text = NonEmptyText::new("Pending").expect("valid text");
        assert!(text.eq_ignore_case("PENDING"));
        assert!(text.eq_ignore_case("pending "));
        assert!(!text.eq_ignore_case("Accepted"));
    }

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        let from_int: RecordId = serde_json::from_str("1").expect("int id");
        let from_str: RecordId = serde_json::from_str("\"1\"").expect("string id");
        let from_float: RecordId = serde_json::from_str("1.0").expect("float id");
        assert_eq!(from_int, from_str);
        assert_eq!(from_float, from_str);
        assert_eq!(RecordId::from(1_i64), from_str);
    }

    #[test]
    fn null_id_is_empty() {
        let id: RecordId = serde_json::from_str("null").expect("null id");
        assert!(id.is_empty());
    }

    #[test]
    fn fractional_ids_keep_their_fraction() {
        assert_eq!(RecordId::from_f64(2.5).as_str(), "2.5");
        assert_eq!(RecordId::from_f64(-0.0).as_str(), "0");
    }

    #[test]
    fn ids_serialise_as_strings() {
        let json = serde_json::to_string(&RecordId::from(42_i64)).expect("serialise");
        assert_eq!(json, "\"42\"");
    }
}
