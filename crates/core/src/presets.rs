//! Saved filter presets.

use crate::filter::FilterCriteria;
use crate::records::SubjectField;
use crate::{DashboardError, DashboardResult};
use hms_wire::{FilterPresetData, Presets, RecordKind};
use std::fs;
use std::path::Path;

/// Load presets from a YAML file.
pub fn load_presets(path: &Path) -> DashboardResult<Vec<FilterPresetData>> {
    let text = fs::read_to_string(path).map_err(DashboardError::FileRead)?;
    Ok(Presets::parse(&text)?)
}

/// Find a preset by name, ignoring case.
pub fn find_preset<'a>(
    presets: &'a [FilterPresetData],
    name: &str,
) -> DashboardResult<&'a FilterPresetData> {
    presets
        .iter()
        .find(|p| p.name.eq_ignore_case(name))
        .ok_or_else(|| DashboardError::InvalidInput(format!("no preset named '{name}'")))
}

/// Turn a preset into criteria for `kind`.
///
/// # Errors
///
/// Returns `DashboardError::InvalidInput` if the preset is bound to another record kind
/// or names an unknown subject field.
pub fn criteria_from_preset(
    preset: &FilterPresetData,
    kind: RecordKind,
) -> DashboardResult<FilterCriteria> {
    if let Some(preset_kind) = preset.kind {
        if preset_kind != kind {
            return Err(DashboardError::InvalidInput(format!(
                "preset '{}' is for {preset_kind}, not {kind}",
                preset.name
            )));
        }
    }

    let mut criteria = FilterCriteria::new();
    for (field, value) in &preset.subjects {
        let field: SubjectField = field.parse()?;
        criteria = criteria.with_subject(field, value.clone());
    }
    if let Some(status) = &preset.status {
        criteria = criteria.with_status(status);
    }
    if let Some(search) = &preset.search {
        criteria = criteria.with_search(search.clone());
    }
    Ok(criteria.with_optional_date(preset.date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hms_types::RecordId;
    use tempfile::TempDir;

    const PRESETS: &str = r#"presets:
  - name: Doctor One Pending
    kind: appointments
    subjects:
      DoctorID: 1
    status: pending
    date: "2025-06-25"
  - name: nurse
    subjects:
      nurseId: 3
"#;

    fn presets() -> Vec<FilterPresetData> {
        Presets::parse(PRESETS).expect("parse presets")
    }

    #[test]
    fn translates_preset_into_criteria() {
        let presets = presets();
        let preset = find_preset(&presets, "doctor one pending").expect("find");
        let criteria = criteria_from_preset(preset, RecordKind::Appointments).expect("criteria");

        assert_eq!(
            criteria.subjects().get(&SubjectField::Doctor),
            Some(&RecordId::from("1"))
        );
        assert_eq!(criteria.status().map(|s| s.as_str()), Some("pending"));
        assert_eq!(criteria.date(), NaiveDate::from_ymd_opt(2025, 6, 25));
        assert_eq!(criteria.search(), None);
    }

    #[test]
    fn rejects_preset_for_other_kind() {
        let presets = presets();
        let preset = find_preset(&presets, "Doctor One Pending").expect("find");
        let err = criteria_from_preset(preset, RecordKind::Notifications)
            .expect_err("should reject kind");
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[test]
    fn rejects_unknown_subject_fields() {
        let presets = presets();
        let preset = find_preset(&presets, "nurse").expect("find");
        let err = criteria_from_preset(preset, RecordKind::Appointments)
            .expect_err("should reject field");
        match err {
            DashboardError::InvalidInput(msg) => assert!(msg.contains("nurseId")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn missing_preset_is_an_error() {
        assert!(find_preset(&presets(), "nobody").is_err());
    }

    #[test]
    fn loads_presets_from_disk() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("presets.yaml");
        fs::write(&path, PRESETS).expect("write presets");
        assert_eq!(load_presets(&path).expect("load").len(), 2);

        let err = load_presets(&dir.path().join("absent.yaml")).expect_err("missing");
        assert!(matches!(err, DashboardError::FileRead(_)));
    }
}
