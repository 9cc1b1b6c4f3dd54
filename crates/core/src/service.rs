//! Fetch, hold, derive: the lifecycle of one dashboard list.
//!
//! Records are fetched wholesale from the store on [`DashboardService::refresh`] and held
//! in memory. Every change of filter criteria re-derives a view from that snapshot
//! without touching the store again. Mutations go to the store first and then refresh
//! the snapshot.

use crate::aggregate::{FilterOutcome, RecencyCounts};
use crate::filter::{FilterCriteria, RecordFilter};
use crate::records::Filterable;
use crate::store::{ImportSummary, RecordStore};
use crate::DashboardResult;
use chrono::{DateTime, Utc};
use hms_types::RecordId;
use std::marker::PhantomData;

pub struct DashboardService<T, S> {
    store: S,
    filter: RecordFilter,
    records: Vec<T>,
    _store_of: PhantomData<fn() -> T>,
}

impl<T, S> DashboardService<T, S>
where
    T: Filterable + Clone,
    S: RecordStore<T>,
{
    /// Create a service with an empty snapshot. Call [`Self::refresh`] to load it.
    pub fn new(store: S, filter: RecordFilter) -> Self {
        Self {
            store,
            filter,
            records: Vec::new(),
            _store_of: PhantomData,
        }
    }

    /// Reload the snapshot from the store. Returns the number of records held.
    pub fn refresh(&mut self) -> DashboardResult<usize> {
        self.records = self.store.fetch_all()?;
        tracing::debug!(count = self.records.len(), "refreshed dashboard snapshot");
        Ok(self.records.len())
    }

    /// The snapshot in stored order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Filtered, sorted records plus their status counts.
    pub fn view(&self, criteria: &FilterCriteria) -> FilterOutcome<T> {
        self.filter.derive(&self.records, criteria)
    }

    /// Recency counts over the records matching `criteria`.
    pub fn recency(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> RecencyCounts {
        let matching: Vec<T> = self.filter.apply(&self.records, criteria);
        self.filter.recency(&matching, now)
    }

    pub fn create(&mut self, record: T) -> DashboardResult<T> {
        let created = self.store.create(record)?;
        self.refresh()?;
        Ok(created)
    }

    pub fn update(&mut self, record: T) -> DashboardResult<T> {
        let updated = self.store.update(record)?;
        self.refresh()?;
        Ok(updated)
    }

    /// Store a batch in one pass, then refresh once.
    pub fn import(&mut self, records: Vec<T>) -> DashboardResult<ImportSummary> {
        let summary = self.store.import(records)?;
        self.refresh()?;
        Ok(summary)
    }

    pub fn delete(&mut self, id: &RecordId) -> DashboardResult<()> {
        self.store.delete(id)?;
        self.refresh()?;
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
