//! Status vocabulary policy.
//!
//! Some dashboards write `Confirmed` where others write `Accepted`. Whether those are
//! the same state is a deployment decision, so the mapping is configuration rather than
//! code: an empty [`StatusSynonyms`] keeps every spelling distinct.

use crate::{DashboardError, DashboardResult};
use hms_types::NonEmptyText;
use std::collections::BTreeMap;

/// Case-insensitive alias to canonical status mapping, one hop deep.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSynonyms {
    aliases: BTreeMap<String, NonEmptyText>,
}

impl StatusSynonyms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as another spelling of `canonical`.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::InvalidInput` when the mapping would chain through
    /// another alias or when `alias` is already mapped elsewhere.
    pub fn with(mut self, alias: NonEmptyText, canonical: NonEmptyText) -> DashboardResult<Self> {
        let alias_key = alias.as_str().to_lowercase();
        let canonical_key = canonical.as_str().to_lowercase();

        if alias_key == canonical_key {
            return Ok(self);
        }
        if self.aliases.contains_key(&canonical_key) {
            return Err(DashboardError::InvalidInput(format!(
                "status synonym target '{canonical}' is itself an alias"
            )));
        }
        if self
            .aliases
            .values()
            .any(|target| target.as_str().to_lowercase() == alias_key)
        {
            return Err(DashboardError::InvalidInput(format!(
                "status '{alias}' is already a synonym target"
            )));
        }
        if let Some(existing) = self.aliases.get(&alias_key) {
            if existing.as_str().to_lowercase() != canonical_key {
                return Err(DashboardError::InvalidInput(format!(
                    "status '{alias}' already maps to '{existing}'"
                )));
            }
        }

        self.aliases.insert(alias_key, canonical);
        Ok(self)
    }

    /// Parse `Alias=Canonical` pairs separated by commas. Blank input is empty.
    pub fn parse(pairs: &str) -> DashboardResult<Self> {
        let mut synonyms = Self::new();
        for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (alias, canonical) = pair.split_once('=').ok_or_else(|| {
                DashboardError::InvalidInput(format!(
                    "status synonym '{pair}' must look like Alias=Canonical"
                ))
            })?;
            let alias = NonEmptyText::new(alias).map_err(|_| {
                DashboardError::InvalidInput(format!("status synonym '{pair}' has no alias"))
            })?;
            let canonical = NonEmptyText::new(canonical).map_err(|_| {
                DashboardError::InvalidInput(format!("status synonym '{pair}' has no target"))
            })?;
            synonyms = synonyms.with(alias, canonical)?;
        }
        Ok(synonyms)
    }

    /// Lower-cased comparison key for a status, after alias resolution.
    pub fn canonical_key(&self, status: &str) -> String {
        let key = status.trim().to_lowercase();
        match self.aliases.get(&key) {
            Some(canonical) => canonical.as_str().to_lowercase(),
            None => key,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_policy_only_folds_case() {
        let synonyms = StatusSynonyms::new();
        assert_eq!(synonyms.canonical_key("PENDING"), "pending");
        assert_eq!(synonyms.canonical_key("Confirmed"), "confirmed");
    }

    #[test]
    fn parses_pairs() {
        let synonyms = StatusSynonyms::parse("Confirmed=Accepted, done = Completed").expect("parse");
        assert_eq!(synonyms.canonical_key("confirmed"), "accepted");
        assert_eq!(synonyms.canonical_key("DONE"), "completed");
        assert_eq!(synonyms.canonical_key("Accepted"), "accepted");
    }

    #[test]
    fn blank_spec_is_empty() {
        assert!(StatusSynonyms::parse("  ").expect("parse").is_empty());
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(StatusSynonyms::parse("Confirmed").is_err());
        assert!(StatusSynonyms::parse("=Accepted").is_err());
        assert!(StatusSynonyms::parse("Confirmed=").is_err());
    }

    #[test]
    fn rejects_chains_and_conflicts() {
        assert!(StatusSynonyms::parse("Confirmed=Accepted,Booked=Confirmed").is_err());
        assert!(StatusSynonyms::parse("Accepted=Approved,Confirmed=Accepted").is_err());
        assert!(StatusSynonyms::parse("Confirmed=Accepted,confirmed=Completed").is_err());
    }

    #[test]
    fn self_mapping_is_ignored() {
        let synonyms = StatusSynonyms::parse("Accepted=accepted").expect("parse");
        assert!(synonyms.is_empty());
    }
}
