//! Record filtering.
//!
//! [`RecordFilter::apply`] is a pure transform: the same records and criteria always give
//! the same ordered output, the output is a subsequence of the input, and nothing in the
//! input is modified. Malformed records degrade to "does not match" or "sorts last"; no
//! record can make a filter pass fail.

use crate::config::CoreConfig;
use crate::records::{Filterable, SubjectField};
use crate::status::StatusSynonyms;
use crate::timestamp::{parse_timestamp, LocalZone};
use chrono::{DateTime, FixedOffset, NaiveDate};
use hms_types::{NonEmptyText, RecordId};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// User-selected constraints. Every criterion is optional; an unset one matches all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    subjects: BTreeMap<SubjectField, RecordId>,
    status: Option<NonEmptyText>,
    date: Option<NaiveDate>,
    search: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`. An empty value clears the constraint.
    pub fn with_subject(mut self, field: SubjectField, value: impl Into<RecordId>) -> Self {
        let value = value.into();
        if value.is_empty() {
            self.subjects.remove(&field);
        } else {
            self.subjects.insert(field, value);
        }
        self
    }

    /// Require the status to equal `status`, ignoring case. Blank clears it.
    pub fn with_status(mut self, status: impl AsRef<str>) -> Self {
        self.status = NonEmptyText::new(status).ok();
        self
    }

    /// Require the record's local calendar day to be `date`.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_optional_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Require some free-text field to contain `term`, ignoring case. Empty clears it.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn subjects(&self) -> &BTreeMap<SubjectField, RecordId> {
        &self.subjects
    }

    pub fn status(&self) -> Option<&NonEmptyText> {
        self.status.as_ref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
            && self.status.is_none()
            && self.date.is_none()
            && self.search.is_none()
    }
}

/// Filter and aggregate engine bound to a local zone and status policy.
///
/// The default uses the host time zone and no status synonyms.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    zone: LocalZone,
    synonyms: StatusSynonyms,
}

impl RecordFilter {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            zone: config.local_zone(),
            synonyms: config.status_synonyms().clone(),
        }
    }

    pub fn with_zone(zone: LocalZone) -> Self {
        Self {
            zone,
            synonyms: StatusSynonyms::new(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self::with_zone(LocalZone::Fixed(offset))
    }

    pub fn with_synonyms(mut self, synonyms: StatusSynonyms) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    pub(crate) fn synonyms(&self) -> &StatusSynonyms {
        &self.synonyms
    }

    pub(crate) fn parse(&self, record: &impl Filterable) -> Option<DateTime<FixedOffset>> {
        record
            .timestamp()
            .and_then(|raw| parse_timestamp(raw, self.zone))
    }

    /// Whether `record` satisfies every set criterion.
    pub fn matches<T: Filterable>(&self, record: &T, criteria: &FilterCriteria) -> bool {
        let subjects_match = criteria.subjects.iter().all(|(field, wanted)| {
            record
                .subject_id(*field)
                .is_some_and(|actual| actual == wanted)
        });
        if !subjects_match {
            return false;
        }

        if let Some(wanted) = &criteria.status {
            let wanted = self.synonyms.canonical_key(wanted.as_str());
            let matched = record
                .status()
                .is_some_and(|actual| self.synonyms.canonical_key(actual) == wanted);
            if !matched {
                return false;
            }
        }

        if let Some(wanted) = criteria.date {
            let matched = self
                .parse(record)
                .is_some_and(|ts| self.zone.date_of(&ts) == wanted);
            if !matched {
                return false;
            }
        }

        if let Some(term) = &criteria.search {
            let term = term.to_lowercase();
            let matched = record
                .search_fields()
                .iter()
                .any(|text| text.to_lowercase().contains(&term));
            if !matched {
                return false;
            }
        }

        true
    }

    /// Filter `records` and order them most recent first.
    ///
    /// Ties keep their input order. Records whose timestamp is missing or unparseable
    /// come last, also in input order.
    pub fn apply<T: Filterable + Clone>(&self, records: &[T], criteria: &FilterCriteria) -> Vec<T> {
        let mut keyed: Vec<(Option<DateTime<FixedOffset>>, &T)> = records
            .iter()
            .filter(|record| self.matches(*record, criteria))
            .map(|record| (self.parse(record), record))
            .collect();

        // `sort_by` is stable, so equal keys keep input order.
        keyed.sort_by(|(a, _), (b, _)| newest_first(a.as_ref(), b.as_ref()));

        tracing::debug!(
            input = records.len(),
            output = keyed.len(),
            "applied record filters"
        );

        keyed.into_iter().map(|(_, record)| record.clone()).collect()
    }
}

fn newest_first(
    a: Option<&DateTime<FixedOffset>>,
    b: Option<&DateTime<FixedOffset>>,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter in the host time zone with no status synonyms.
pub fn apply_filters<T: Filterable + Clone>(records: &[T], criteria: &FilterCriteria) -> Vec<T> {
    RecordFilter::default().apply(records, criteria)
}
