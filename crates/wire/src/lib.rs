//! Backend payload boundary for the hospital dashboards.
//!
//! The REST backend serialises its records inconsistently: ids arrive as numbers or
//! strings, and the same field may be spelt `doctorID`, `DoctorID` or `doctor_id`
//! depending on the endpoint. This crate is the single place that deals with that:
//! - tolerant JSON collections are normalised into canonical record carriers
//! - canonical carriers render back to camelCase JSON
//! - saved filter presets are parsed from strict YAML
//!
//! Nothing downstream of this crate should ever look at a raw backend key.

pub mod appointment;
pub mod medical_record;
pub mod notification;
pub mod preset;
pub mod raw;

pub use appointment::Appointment;
pub use medical_record::MedicalRecord;
pub use notification::Notification;
pub use preset::{FilterPresetData, Presets};
pub use raw::{normalise_key, RawFields};

pub use hms_types::RecordId;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors returned by the `hms-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;

/// The record collections served by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Appointments,
    MedicalRecords,
    Notifications,
}

impl RecordKind {
    /// Collection name used for envelopes and storage file stems.
    pub fn collection_name(self) -> &'static str {
        match self {
            RecordKind::Appointments => "appointments",
            RecordKind::MedicalRecords => "medical_records",
            RecordKind::Notifications => "notifications",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection_name())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "appointments" | "appointment" => Ok(RecordKind::Appointments),
            "medicalrecords" | "medicalrecord" | "records" => Ok(RecordKind::MedicalRecords),
            "notifications" | "notification" => Ok(RecordKind::Notifications),
            _ => Err(WireError::InvalidInput(format!("unknown record kind '{s}'"))),
        }
    }
}

/// Mapping from a normalised backend object to a canonical record carrier.
///
/// Implementations never fail: absent or malformed fields become `None` or an empty id.
pub trait FromRaw: Sized {
    const KIND: RecordKind;

    fn from_raw(raw: &RawFields) -> Self;
}

/// Envelope keys that may wrap the record array in a backend response.
const ENVELOPE_KEYS: &[&str] = &["data", "items", "results", "records"];

/// Parse a backend JSON response into canonical records.
///
/// Accepts either a bare array or an object holding the array under `data`, `items`,
/// `results`, `records` or the collection's own name. Array elements that are not JSON
/// objects are skipped.
///
/// # Errors
///
/// Returns [`WireError`] if the text is not JSON or contains no record array.
pub fn parse_collection<T: FromRaw>(json_text: &str) -> WireResult<Vec<T>> {
    let value: Value = serde_json::from_str(json_text)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => {
            let wanted = normalise_key(T::KIND.collection_name());
            let found = map.into_iter().find_map(|(key, value)| {
                let key = normalise_key(&key);
                let is_envelope = key == wanted || ENVELOPE_KEYS.contains(&key.as_str());
                match value {
                    Value::Array(items) if is_envelope => Some(items),
                    _ => None,
                }
            });
            found.ok_or_else(|| {
                WireError::InvalidInput(format!(
                    "response object does not contain a {} array",
                    T::KIND
                ))
            })?
        }
        _ => {
            return Err(WireError::InvalidInput(format!(
                "expected a JSON array of {}",
                T::KIND
            )))
        }
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match RawFields::from_value(item) {
            Some(raw) => Some(T::from_raw(&raw)),
            None => {
                tracing::warn!(kind = %T::KIND, index, "skipping non-object payload element");
                None
            }
        })
        .collect();

    tracing::debug!(kind = %T::KIND, total, parsed = records.len(), "parsed backend payload");
    Ok(records)
}

/// Render canonical records as pretty JSON.
pub fn render_collection<T: Serialize>(records: &[T]) -> WireResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
