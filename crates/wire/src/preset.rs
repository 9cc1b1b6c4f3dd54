//! Saved filter presets and their YAML wire model.
//!
//! A preset is a named, reusable set of dashboard filter criteria, for example
//! "my pending appointments" for a given doctor. Presets live in a small YAML file:
//!
//! ```yaml
//! presets:
//!   - name: doctor-1-pending
//!     kind: appointments
//!     subjects:
//!       doctorId: 1
//!     status: Pending
//!     date: 2025-06-25
//!     search: follow-up
//! ```
//!
//! Unlike backend payloads, preset files are authored by hand and parsed strictly:
//! unknown keys, malformed dates and duplicate names are rejected with the path of
//! the offending field.

use crate::{RecordKind, WireError};
use chrono::NaiveDate;
use hms_types::{NonEmptyText, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Domain-level carrier for one filter preset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterPresetData {
    pub name: NonEmptyText,

    /// Collection the preset is meant for; `None` means any.
    pub kind: Option<RecordKind>,

    /// Subject field name (any casing) to exact-match id.
    pub subjects: BTreeMap<String, RecordId>,

    pub status: Option<String>,

    pub date: Option<NaiveDate>,

    pub search: Option<String>,
}

/// Preset file operations.
///
/// This is a zero-sized type used for namespacing preset-related operations.
pub struct Presets;

impl Presets {
    /// Parse a preset file from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if:
    /// - the YAML does not match the preset schema (the failing path is reported),
    /// - a preset has a blank name or two presets share a name (case-insensitive),
    /// - a date is not `YYYY-MM-DD`.
    pub fn parse(yaml_text: &str) -> Result<Vec<FilterPresetData>, WireError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, PresetFileWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(WireError::Translation(format!(
                    "Preset schema mismatch at {path}: {source}"
                )));
            }
        };

        let mut seen = HashSet::new();
        let mut presets = Vec::with_capacity(wire.presets.len());
        for (index, preset) in wire.presets.into_iter().enumerate() {
            let data = wire_to_domain(index, preset)?;
            if !seen.insert(data.name.as_str().to_lowercase()) {
                return Err(WireError::InvalidInput(format!(
                    "duplicate preset name '{}'",
                    data.name
                )));
            }
            presets.push(data);
        }

        Ok(presets)
    }

    /// Render presets as YAML text.
    pub fn render(presets: &[FilterPresetData]) -> Result<String, WireError> {
        let wire = PresetFileWire {
            presets: presets.iter().map(domain_to_wire).collect(),
        };
        serde_yaml::to_string(&wire)
            .map_err(|e| WireError::Translation(format!("Failed to serialize presets: {e}")))
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PresetFileWire {
    #[serde(default)]
    presets: Vec<PresetWire>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PresetWire {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<RecordKind>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    subjects: BTreeMap<String, RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(index: usize, wire: PresetWire) -> Result<FilterPresetData, WireError> {
    let name = NonEmptyText::new(&wire.name)
        .map_err(|_| WireError::InvalidInput(format!("presets[{index}].name cannot be empty")))?;

    let date = wire
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| {
                WireError::Translation(format!(
                    "presets[{index}].date must be YYYY-MM-DD, got '{d}'"
                ))
            })
        })
        .transpose()?;

    Ok(FilterPresetData {
        name,
        kind: wire.kind,
        subjects: wire.subjects,
        status: wire.status.filter(|s| !s.trim().is_empty()),
        date,
        search: wire.search.filter(|s| !s.is_empty()),
    })
}

fn domain_to_wire(data: &FilterPresetData) -> PresetWire {
    PresetWire {
        name: data.name.to_string(),
        kind: data.kind,
        subjects: data.subjects.clone(),
        status: data.status.clone(),
        date: data.date.map(|d| d.format("%Y-%m-%d").to_string()),
        search: data.search.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"presets:
  - name: doctor-1-pending
    kind: appointments
    subjects:
      doctorId: 1
    status: Pending
    date: "2025-06-25"
  - name: flu-records
    kind: medical_records
    search: flu
"#;

    #[test]
    fn parses_sample_presets() {
        let presets = Presets::parse(SAMPLE).expect("parse presets");
        assert_eq!(presets.len(), 2);

        let first = &presets[0];
        assert_eq!(first.name.as_str(), "doctor-1-pending");
        assert_eq!(first.kind, Some(RecordKind::Appointments));
        assert_eq!(first.subjects.get("doctorId").map(RecordId::as_str), Some("1"));
        assert_eq!(first.status.as_deref(), Some("Pending"));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 6, 25));

        let second = &presets[1];
        assert_eq!(second.kind, Some(RecordKind::MedicalRecords));
        assert_eq!(second.search.as_deref(), Some("flu"));
        assert!(second.subjects.is_empty());
    }

    #[test]
    fn rendered_presets_parse_back() {
        let presets = Presets::parse(SAMPLE).expect("parse presets");
        let yaml = Presets::render(&presets).expect("render presets");
        let reparsed = Presets::parse(&yaml).expect("reparse presets");
        assert_eq!(presets, reparsed);
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let input = r#"presets:
  - name: x
    colour: red
"#;
        let err = Presets::parse(input).expect_err("should reject unknown key");
        match err {
            WireError::Translation(msg) => {
                assert!(msg.contains("presets[0]"));
                assert!(msg.contains("colour"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_dates() {
        let input = r#"presets:
  - name: x
    date: 25/06/2025
"#;
        let err = Presets::parse(input).expect_err("should reject date");
        match err {
            WireError::Translation(msg) => assert!(msg.contains("YYYY-MM-DD")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let input = r#"presets:
  - name: Mine
  - name: mine
"#;
        let err = Presets::parse(input).expect_err("should reject duplicate");
        assert!(matches!(err, WireError::InvalidInput(_)));
    }

    #[test]
    fn rejects_blank_names() {
        let input = r#"presets:
  - name: "  "
"#;
        assert!(matches!(
            Presets::parse(input),
            Err(WireError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_document_has_no_presets() {
        let presets = Presets::parse("presets: []\n").expect("parse");
        assert!(presets.is_empty());
    }
}
