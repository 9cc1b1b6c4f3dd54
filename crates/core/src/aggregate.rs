//! Summary counters for dashboard tiles.

use crate::filter::{FilterCriteria, RecordFilter};
use crate::records::Filterable;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Record counts per known status plus the overall total.
///
/// Every known status has a bucket, even at zero. Records with an unknown or missing
/// status only count towards `total`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub total: usize,
    #[serde(flatten)]
    pub by_status: BTreeMap<String, usize>,
}

impl CategoryCounts {
    /// Count for `status`, ignoring case. Unknown statuses are zero.
    pub fn get(&self, status: &str) -> usize {
        let wanted = status.trim().to_lowercase();
        self.by_status
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Where records fall relative to a reference instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecencyCounts {
    /// Same local calendar day as the reference.
    pub today: usize,
    /// Later than the reference, on a later day.
    pub upcoming: usize,
    /// Earlier than the reference, on an earlier day.
    pub past: usize,
    /// Missing or unparseable timestamp.
    pub undated: usize,
}

/// Filtered records together with the counts over them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOutcome<T> {
    pub filtered: Vec<T>,
    pub counts: CategoryCounts,
}

impl RecordFilter {
    /// Count `records` by status in a single pass.
    pub fn counts<T: Filterable>(&self, records: &[T]) -> CategoryCounts {
        let known: Vec<(&'static str, String)> = T::KNOWN_STATUSES
            .iter()
            .map(|status| (*status, self.synonyms().canonical_key(status)))
            .collect();

        let mut by_status: BTreeMap<String, usize> = known
            .iter()
            .map(|(name, _)| ((*name).to_owned(), 0))
            .collect();

        for status in records.iter().filter_map(|record| record.status()) {
            let key = self.synonyms().canonical_key(status);
            if let Some((name, _)) = known.iter().find(|(_, known_key)| *known_key == key) {
                *by_status.entry((*name).to_owned()).or_insert(0) += 1;
            }
        }

        CategoryCounts {
            total: records.len(),
            by_status,
        }
    }

    /// Split `records` into today, upcoming, past and undated relative to `now`.
    pub fn recency<T: Filterable>(&self, records: &[T], now: DateTime<Utc>) -> RecencyCounts {
        let zone = self.zone();
        let today = zone.date_of(&now);

        let mut counts = RecencyCounts::default();
        for record in records {
            match self.parse(record) {
                None => counts.undated += 1,
                Some(ts) if zone.date_of(&ts) == today => counts.today += 1,
                Some(ts) if ts.with_timezone(&Utc) > now => counts.upcoming += 1,
                Some(_) => counts.past += 1,
            }
        }
        counts
    }

    /// Filter, sort and count in one call.
    pub fn derive<T: Filterable + Clone>(
        &self,
        records: &[T],
        criteria: &FilterCriteria,
    ) -> FilterOutcome<T> {
        let filtered = self.apply(records, criteria);
        let counts = self.counts(&filtered);
        FilterOutcome { filtered, counts }
    }
}

/// Count with no status synonyms.
pub fn compute_counts<T: Filterable>(records: &[T]) -> CategoryCounts {
    RecordFilter::default().counts(records)
}
