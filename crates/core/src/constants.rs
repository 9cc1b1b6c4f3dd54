//! Constants used throughout the dashboard core crate.
//!
//! Environment variable names, storage filenames and status vocabularies live here so
//! the binary and the library agree on them.

/// Default directory for stored record collections when none is configured.
pub const DEFAULT_DATA_DIR: &str = "hms_data";

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "HMS_DATA_DIR";

/// Environment variable holding the local UTC offset (`local`, `UTC`, `+05:30`).
pub const UTC_OFFSET_ENV: &str = "HMS_UTC_OFFSET";

/// Environment variable holding status synonyms (`Confirmed=Accepted,...`).
pub const STATUS_SYNONYMS_ENV: &str = "HMS_STATUS_SYNONYMS";

/// File extension for stored collections.
pub const COLLECTION_EXTENSION: &str = "json";

/// Statuses an appointment moves through.
pub const APPOINTMENT_STATUSES: &[&str] = &["Pending", "Accepted", "Completed", "Rejected"];

/// Delivery states of an admin notification.
pub const NOTIFICATION_STATUSES: &[&str] = &["Sent", "Scheduled", "Draft"];

/// Medical records carry no workflow status.
pub const MEDICAL_RECORD_STATUSES: &[&str] = &[];

/// Every known status across record kinds, in display order.
pub const ALL_STATUSES: &[&str] = &[
    "Pending",
    "Accepted",
    "Completed",
    "Rejected",
    "Sent",
    "Scheduled",
    "Draft",
];
