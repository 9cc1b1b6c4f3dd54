//! # HMS Core
//!
//! Record filtering and aggregation for the hospital management dashboards.
//!
//! The admin and doctor dashboards all show lists of appointments, medical records and
//! notifications that the user narrows down by doctor, patient, status, day and free
//! text, with summary tiles on top. This crate holds that logic once:
//! - [`records`]: per-kind field accessors over the canonical carriers from `hms-wire`
//! - [`filter`]: criteria and the pure filter/sort transform
//! - [`aggregate`]: status and recency counters
//! - [`store`]: the data-access interface the dashboards fetch through
//! - [`service`]: fetch → hold → derive for one list
//!
//! **No transport concerns**: HTTP calls to the backend, sessions and rendering belong
//! to callers.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod presets;
pub mod records;
pub mod service;
pub mod status;
pub mod store;
pub mod timestamp;

pub use aggregate::{compute_counts, CategoryCounts, FilterOutcome, RecencyCounts};
pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_DIR;
pub use error::{DashboardError, DashboardResult};
pub use filter::{apply_filters, FilterCriteria, RecordFilter};
pub use records::{Filterable, Identifiable, Record, SubjectField};
pub use service::DashboardService;
pub use status::StatusSynonyms;
pub use store::{ImportSummary, InMemoryStore, JsonFileStore, RecordStore};
pub use timestamp::LocalZone;

pub use hms_types::{NonEmptyText, RecordId};
pub use hms_wire::{Appointment, MedicalRecord, Notification, RecordKind};
