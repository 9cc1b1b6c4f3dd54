//! Lenient ISO-8601 timestamp handling.
//!
//! Record timestamps come straight from the backend and are not trusted to be
//! well-formed. Anything that does not parse is `None`, which the filter treats as
//! "never matches a date" and "sorts oldest".

use chrono::{
    DateTime, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Zone whose calendar decides which day a timestamp falls on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocalZone {
    /// The host's time zone. Each instant is placed with the offset in force at that
    /// instant, so daylight-saving changes are honoured.
    #[default]
    Host,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl LocalZone {
    pub fn utc() -> Self {
        LocalZone::Fixed(Utc.fix())
    }

    /// Calendar day of `timestamp` in this zone.
    pub fn date_of<Tz: TimeZone>(self, timestamp: &DateTime<Tz>) -> NaiveDate {
        match self {
            LocalZone::Host => timestamp.with_timezone(&Local).date_naive(),
            LocalZone::Fixed(offset) => timestamp.with_timezone(&offset).date_naive(),
        }
    }

    /// Read a wall-clock value in this zone.
    ///
    /// An ambiguous wall time (clocks going back) takes the earlier instant. A wall time
    /// skipped by clocks going forward takes the offset in force just before the jump.
    pub fn resolve_naive(self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            LocalZone::Host => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(dt.offset()))
                .or_else(|| {
                    let day_before = naive.checked_sub_days(Days::new(1))?;
                    let before = Local.offset_from_utc_datetime(&day_before);
                    before.from_local_datetime(naive).single()
                }),
            LocalZone::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

/// Parse a timestamp. Values without an explicit offset are read in `zone`.
///
/// Date-only values (`2025-06-25`) are midnight of that local day.
pub fn parse_timestamp(raw: &str, zone: LocalZone) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(parsed);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    zone.resolve_naive(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32) -> LocalZone {
        LocalZone::Fixed(FixedOffset::east_opt(hours * 3600).expect("valid offset"))
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    /// UK rules (GMT in winter, BST in summer) as a POSIX TZ string, so no tz database
    /// is needed.
    const LONDON_TZ: &str = "GMT0BST,M3.5.0/1,M10.5.0";

    #[test]
    fn parses_rfc3339_with_zulu() {
        let ts = parse_timestamp("2025-06-25T23:59:00Z", offset(0)).expect("parse");
        assert_eq!(offset(0).date_of(&ts), day(2025, 6, 25));
    }

    #[test]
    fn local_offset_moves_the_calendar_day() {
        let ts = parse_timestamp("2025-06-25T23:59:00Z", offset(0)).expect("parse");
        assert_eq!(offset(2).date_of(&ts), day(2025, 6, 26));
        assert_eq!(offset(-5).date_of(&ts), day(2025, 6, 25));
    }

    #[test]
    fn naive_values_are_local() {
        let ts = parse_timestamp("2025-06-25T23:59:00", offset(9)).expect("parse");
        assert_eq!(offset(9).date_of(&ts), day(2025, 6, 25));
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn host_zone_uses_the_offset_of_each_instant() {
        std::env::set_var("TZ", LONDON_TZ);
        let host = LocalZone::Host;

        let winter = parse_timestamp("2026-01-15T23:30:00Z", host).expect("winter");
        assert_eq!(host.date_of(&winter), day(2026, 1, 15));
        let summer = parse_timestamp("2026-07-15T23:30:00Z", host).expect("summer");
        assert_eq!(host.date_of(&summer), day(2026, 7, 16));

        let naive_winter = parse_timestamp("2026-01-15T12:00:00", host).expect("naive winter");
        assert_eq!(naive_winter.offset().local_minus_utc(), 0);
        let naive_summer = parse_timestamp("2026-07-15T12:00:00", host).expect("naive summer");
        assert_eq!(naive_summer.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn host_zone_resolves_wall_times_around_transitions() {
        std::env::set_var("TZ", LONDON_TZ);
        let host = LocalZone::Host;

        // 01:30 does not exist on 2026-03-29 in London.
        let skipped = parse_timestamp("2026-03-29T01:30:00", host).expect("gap");
        assert_eq!(skipped.offset().local_minus_utc(), 0);

        // 01:30 happens twice on 2026-10-25; the BST reading comes first.
        let repeated = parse_timestamp("2026-10-25T01:30:00", host).expect("overlap");
        assert_eq!(repeated.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn parses_other_common_shapes() {
        let local = offset(0);
        assert!(parse_timestamp("2025-06-25T08:15:30.123Z", local).is_some());
        assert!(parse_timestamp("2025-06-25T08:15:30.123+0100", local).is_some());
        assert!(parse_timestamp("2025-06-25 08:15:30", local).is_some());
        assert!(parse_timestamp("2025-06-25T08:15", local).is_some());
        assert!(parse_timestamp("2025-06-25 08:15", local).is_some());
    }

    #[test]
    fn date_only_is_local_midnight() {
        let local = offset(-8);
        let ts = parse_timestamp("2025-06-25", local).expect("parse");
        assert_eq!(local.date_of(&ts), day(2025, 6, 25));
        assert_eq!(ts.offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn garbage_is_none() {
        let local = offset(0);
        assert_eq!(parse_timestamp("", local), None);
        assert_eq!(parse_timestamp("yesterday", local), None);
        assert_eq!(parse_timestamp("2025-13-45", local), None);
    }
}
