//! Data-access interface between the dashboards and wherever records live.
//!
//! The filter layer never owns storage. Views receive a [`RecordStore`] and only ever
//! see the vectors it hands back. Two implementations are provided:
//!
//! - [`InMemoryStore`]: an owned vector, used by tests and short-lived sessions
//! - [`JsonFileStore`]: one canonical JSON array per record kind on disk
//!
//! # Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── appointments.json
//! ├── medical_records.json
//! └── notifications.json
//! ```
//!
//! Files are read through the tolerant payload adapter, so a raw backend export can be
//! dropped in place and is normalised on first write.

use crate::records::Identifiable;
use crate::{DashboardError, DashboardResult};
use hms_types::RecordId;
use hms_wire::{parse_collection, render_collection, FromRaw};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Fetch/create/update/delete over one record collection.
pub trait RecordStore<T> {
    /// Every record in the collection, in stored order.
    fn fetch_all(&self) -> DashboardResult<Vec<T>>;

    /// Store a new record. A record without an id is given a fresh UUID.
    ///
    /// # Errors
    ///
    /// `DashboardError::DuplicateId` if a record with the same id exists.
    fn create(&mut self, record: T) -> DashboardResult<T>;

    /// Replace the record with the same id.
    ///
    /// # Errors
    ///
    /// `DashboardError::NotFound` if no record has that id.
    fn update(&mut self, record: T) -> DashboardResult<T>;

    /// Remove the record with `id`.
    ///
    /// # Errors
    ///
    /// `DashboardError::NotFound` if no record has that id.
    fn delete(&mut self, id: &RecordId) -> DashboardResult<()>;

    /// Create a batch of records, skipping any whose id already exists.
    fn import(&mut self, records: Vec<T>) -> DashboardResult<ImportSummary>;
}

/// Outcome of [`RecordStore::import`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    /// Ids that were already present, in payload order.
    pub skipped: Vec<RecordId>,
}

fn new_record_id() -> RecordId {
    RecordId::new(Uuid::new_v4().simple().to_string())
}

fn insert_record<T: Identifiable + FromRaw + Clone>(
    records: &mut Vec<T>,
    mut record: T,
) -> DashboardResult<T> {
    if record.id().is_empty() {
        record.set_id(new_record_id());
    }
    if records.iter().any(|existing| existing.id() == record.id()) {
        return Err(DashboardError::DuplicateId {
            kind: T::KIND,
            id: record.id().clone(),
        });
    }
    records.push(record.clone());
    Ok(record)
}

fn insert_batch<T: Identifiable + FromRaw>(existing: &mut Vec<T>, records: Vec<T>) -> ImportSummary {
    let mut ids: HashSet<RecordId> = existing.iter().map(|r| r.id().clone()).collect();
    let mut summary = ImportSummary::default();

    for mut record in records {
        if record.id().is_empty() {
            record.set_id(new_record_id());
        }
        if !ids.insert(record.id().clone()) {
            tracing::warn!(kind = %T::KIND, id = %record.id(), "skipping record with existing id");
            summary.skipped.push(record.id().clone());
            continue;
        }
        existing.push(record);
        summary.created += 1;
    }
    summary
}

fn replace_record<T: Identifiable + FromRaw + Clone>(
    records: &mut [T],
    record: T,
) -> DashboardResult<T> {
    let slot = records
        .iter_mut()
        .find(|existing| existing.id() == record.id())
        .ok_or_else(|| DashboardError::NotFound {
            kind: T::KIND,
            id: record.id().clone(),
        })?;
    *slot = record.clone();
    Ok(record)
}

fn remove_record<T: Identifiable + FromRaw>(
    records: &mut Vec<T>,
    id: &RecordId,
) -> DashboardResult<()> {
    let before = records.len();
    records.retain(|existing| existing.id() != id);
    if records.len() == before {
        return Err(DashboardError::NotFound {
            kind: T::KIND,
            id: id.clone(),
        });
    }
    Ok(())
}

/// Records held in memory for the lifetime of the store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore<T> {
    records: Vec<T>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self { records }
    }
}

impl<T: Identifiable + FromRaw + Clone> RecordStore<T> for InMemoryStore<T> {
    fn fetch_all(&self) -> DashboardResult<Vec<T>> {
        Ok(self.records.clone())
    }

    fn create(&mut self, record: T) -> DashboardResult<T> {
        insert_record(&mut self.records, record)
    }

    fn update(&mut self, record: T) -> DashboardResult<T> {
        replace_record(&mut self.records, record)
    }

    fn delete(&mut self, id: &RecordId) -> DashboardResult<()> {
        remove_record(&mut self.records, id)
    }

    fn import(&mut self, records: Vec<T>) -> DashboardResult<ImportSummary> {
        Ok(insert_batch(&mut self.records, records))
    }
}

/// A collection persisted as one JSON array file.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _kind: std::marker::PhantomData<T>,
}

impl<T> JsonFileStore<T> {
    /// Bind a store to `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _kind: std::marker::PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Identifiable + FromRaw + Serialize + Clone> JsonFileStore<T> {
    fn read(&self) -> DashboardResult<Vec<T>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(parse_collection(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(DashboardError::FileRead(e)),
        }
    }

    /// Write via a sibling temp file and rename so readers never see a partial file.
    fn write(&self, records: &[T]) -> DashboardResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(DashboardError::StorageDirCreation)?;
        }

        let json = render_collection(records).map_err(|e| match e {
            hms_wire::WireError::InvalidJson(e) => DashboardError::Serialization(e),
            other => DashboardError::Wire(other),
        })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json).map_err(DashboardError::FileWrite)?;
        fs::rename(&tmp_path, &self.path).map_err(DashboardError::FileWrite)?;
        Ok(())
    }
}

impl<T: Identifiable + FromRaw + Serialize + Clone> RecordStore<T> for JsonFileStore<T> {
    fn fetch_all(&self) -> DashboardResult<Vec<T>> {
        self.read()
    }

    fn create(&mut self, record: T) -> DashboardResult<T> {
        let mut records = self.read()?;
        let created = insert_record(&mut records, record)?;
        self.write(&records)?;
        tracing::info!(kind = %T::KIND, id = %created.id(), "created record");
        Ok(created)
    }

    fn update(&mut self, record: T) -> DashboardResult<T> {
        let mut records = self.read()?;
        let updated = replace_record(&mut records, record)?;
        self.write(&records)?;
        tracing::info!(kind = %T::KIND, id = %updated.id(), "updated record");
        Ok(updated)
    }

    fn delete(&mut self, id: &RecordId) -> DashboardResult<()> {
        let mut records = self.read()?;
        remove_record(&mut records, id)?;
        self.write(&records)?;
        tracing::info!(kind = %T::KIND, id = %id, "deleted record");
        Ok(())
    }

    fn import(&mut self, records: Vec<T>) -> DashboardResult<ImportSummary> {
        let mut stored = self.read()?;
        let summary = insert_batch(&mut stored, records);
        if summary.created > 0 {
            self.write(&stored)?;
        }
        tracing::info!(
            kind = %T::KIND,
            created = summary.created,
            skipped = summary.skipped.len(),
            "imported records"
        );
        Ok(summary)
    }
}
