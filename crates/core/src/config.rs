//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the filter
//! and store types. Nothing in this crate reads environment variables while handling
//! records; the helpers here only parse values the binary has already read.

use crate::constants::COLLECTION_EXTENSION;
use crate::status::StatusSynonyms;
use crate::{DashboardError, DashboardResult};
use crate::timestamp::LocalZone;
use chrono::FixedOffset;
use hms_wire::RecordKind;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    local_zone: LocalZone,
    status_synonyms: StatusSynonyms,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        data_dir: PathBuf,
        local_zone: LocalZone,
        status_synonyms: StatusSynonyms,
    ) -> DashboardResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(DashboardError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            local_zone,
            status_synonyms,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the stored collection for `kind`.
    pub fn collection_path(&self, kind: RecordKind) -> PathBuf {
        self.data_dir
            .join(kind.collection_name())
            .with_extension(COLLECTION_EXTENSION)
    }

    /// Zone used to turn timestamps into local calendar days.
    pub fn local_zone(&self) -> LocalZone {
        self.local_zone
    }

    pub fn status_synonyms(&self) -> &StatusSynonyms {
        &self.status_synonyms
    }
}

/// Parse the local zone from an optional string value.
///
/// Accepts `local` (host time zone), `UTC`/`Z`, and `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`.
/// `None` or blank resolves to the host time zone.
pub fn local_zone_from_env_value(value: Option<String>) -> DashboardResult<LocalZone> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(LocalZone::Host);
    };

    match value.to_ascii_lowercase().as_str() {
        "local" => return Ok(LocalZone::Host),
        "utc" | "z" | "gmt" => return Ok(LocalZone::utc()),
        _ => {}
    }

    parse_signed_offset(&value).map(LocalZone::Fixed).ok_or_else(|| {
        DashboardError::InvalidInput(format!(
            "UTC offset '{value}' must be 'local', 'UTC' or look like +05:30"
        ))
    })
}

/// Parse status synonyms from an optional string value; `None` is empty.
pub fn status_synonyms_from_env_value(value: Option<String>) -> DashboardResult<StatusSynonyms> {
    match value {
        Some(pairs) => StatusSynonyms::parse(&pairs),
        None => Ok(StatusSynonyms::new()),
    }
}

/// Resolve the data directory, falling back to `default` when unset or blank.
pub fn data_dir_from_env_value(value: Option<String>, default: &str) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_signed_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_seconds(zone: LocalZone) -> i32 {
        match zone {
            LocalZone::Fixed(offset) => offset.local_minus_utc(),
            LocalZone::Host => panic!("expected a fixed offset"),
        }
    }

    #[test]
    fn parses_named_zones() {
        assert_eq!(
            local_zone_from_env_value(Some("UTC".into())).expect("utc"),
            LocalZone::utc()
        );
        assert_eq!(
            local_zone_from_env_value(Some("z".into())).expect("z"),
            LocalZone::utc()
        );
        assert_eq!(
            local_zone_from_env_value(Some("Local".into())).expect("local"),
            LocalZone::Host
        );
        assert_eq!(
            local_zone_from_env_value(None).expect("none"),
            LocalZone::Host
        );
    }

    #[test]
    fn parses_signed_offsets() {
        let ist = local_zone_from_env_value(Some("+05:30".into())).expect("ist");
        assert_eq!(fixed_seconds(ist), 5 * 3600 + 30 * 60);

        let est = local_zone_from_env_value(Some("-0500".into())).expect("est");
        assert_eq!(fixed_seconds(est), -5 * 3600);

        let short = local_zone_from_env_value(Some("+02".into())).expect("short");
        assert_eq!(fixed_seconds(short), 2 * 3600);
    }

    #[test]
    fn rejects_bad_offsets() {
        for bad in ["05:30", "+5:3", "+25:00", "+01:75", "Europe/London"] {
            let err = local_zone_from_env_value(Some(bad.into())).expect_err(bad);
            assert!(matches!(err, DashboardError::InvalidInput(_)));
        }
    }

    #[test]
    fn collection_paths_live_under_data_dir() {
        let cfg = CoreConfig::new(
            PathBuf::from("/tmp/hms"),
            LocalZone::utc(),
            StatusSynonyms::new(),
        )
        .expect("config");
        assert_eq!(
            cfg.collection_path(RecordKind::MedicalRecords),
            PathBuf::from("/tmp/hms/medical_records.json")
        );
    }

    #[test]
    fn rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::new(), LocalZone::utc(), StatusSynonyms::new())
            .expect_err("should reject");
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[test]
    fn data_dir_falls_back_to_default() {
        assert_eq!(
            data_dir_from_env_value(Some("  ".into()), "hms_data"),
            PathBuf::from("hms_data")
        );
        assert_eq!(
            data_dir_from_env_value(Some("/srv/hms".into()), "hms_data"),
            PathBuf::from("/srv/hms")
        );
    }
}
