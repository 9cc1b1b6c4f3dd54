//! Field accessors that let one filter implementation serve every record kind.
//!
//! Each dashboard list (appointments, medical records, notifications) used to carry its
//! own copy of the filter code. Here a record kind only describes where its timestamp,
//! status, subject ids and searchable text live; [`crate::filter::RecordFilter`] does
//! the rest.

use crate::constants::{
    ALL_STATUSES, APPOINTMENT_STATUSES, MEDICAL_RECORD_STATUSES, NOTIFICATION_STATUSES,
};
use crate::{DashboardError, DashboardResult};
use hms_types::RecordId;
use hms_wire::{normalise_key, Appointment, MedicalRecord, Notification, RecordKind};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Foreign identifiers a record can be filtered on by exact match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubjectField {
    Doctor,
    Patient,
    Recipient,
}

impl SubjectField {
    /// Canonical camelCase field name.
    pub fn field_name(self) -> &'static str {
        match self {
            SubjectField::Doctor => "doctorId",
            SubjectField::Patient => "patientId",
            SubjectField::Recipient => "recipientId",
        }
    }
}

impl fmt::Display for SubjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for SubjectField {
    type Err = DashboardError;

    /// Accepts `doctor`, `doctorId`, `doctor_id`, `DoctorID` and so on.
    fn from_str(s: &str) -> DashboardResult<Self> {
        let key = normalise_key(s);
        let key = key.strip_suffix("id").unwrap_or(&key);
        match key {
            "doctor" => Ok(SubjectField::Doctor),
            "patient" => Ok(SubjectField::Patient),
            "recipient" | "user" => Ok(SubjectField::Recipient),
            _ => Err(DashboardError::InvalidInput(format!(
                "unknown subject field '{s}'"
            ))),
        }
    }
}

/// Records with a stable identity within their collection.
pub trait Identifiable {
    fn id(&self) -> &RecordId;

    fn set_id(&mut self, id: RecordId);
}

/// Per-kind field accessor consumed by the filter and aggregate layer.
pub trait Filterable: Identifiable {
    /// Statuses that get their own counter bucket.
    const KNOWN_STATUSES: &'static [&'static str];

    /// Raw ISO-8601 timestamp used for date matching and ordering.
    fn timestamp(&self) -> Option<&str>;

    fn status(&self) -> Option<&str>;

    /// `None` when the record kind has no such subject or it is unset.
    fn subject_id(&self, field: SubjectField) -> Option<&RecordId>;

    /// Human-authored text eligible for substring search. Absent fields are omitted.
    fn search_fields(&self) -> Vec<&str>;
}

fn present(id: &RecordId) -> Option<&RecordId> {
    (!id.is_empty()).then_some(id)
}

fn texts<'a>(fields: &[&'a Option<String>]) -> Vec<&'a str> {
    fields.iter().filter_map(|f| f.as_deref()).collect()
}

impl Identifiable for Appointment {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Filterable for Appointment {
    const KNOWN_STATUSES: &'static [&'static str] = APPOINTMENT_STATUSES;

    fn timestamp(&self) -> Option<&str> {
        self.date_time.as_deref()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn subject_id(&self, field: SubjectField) -> Option<&RecordId> {
        match field {
            SubjectField::Doctor => present(&self.doctor_id),
            SubjectField::Patient => present(&self.patient_id),
            SubjectField::Recipient => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        texts(&[
            &self.patient_name,
            &self.doctor_name,
            &self.reason,
            &self.notes,
        ])
    }
}

impl Identifiable for MedicalRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Filterable for MedicalRecord {
    const KNOWN_STATUSES: &'static [&'static str] = MEDICAL_RECORD_STATUSES;

    fn timestamp(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn status(&self) -> Option<&str> {
        None
    }

    fn subject_id(&self, field: SubjectField) -> Option<&RecordId> {
        match field {
            SubjectField::Doctor => present(&self.doctor_id),
            SubjectField::Patient => present(&self.patient_id),
            SubjectField::Recipient => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        texts(&[
            &self.patient_name,
            &self.doctor_name,
            &self.diagnosis,
            &self.treatment,
            &self.prescription,
            &self.notes,
        ])
    }
}

impl Identifiable for Notification {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Filterable for Notification {
    const KNOWN_STATUSES: &'static [&'static str] = NOTIFICATION_STATUSES;

    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn subject_id(&self, field: SubjectField) -> Option<&RecordId> {
        match field {
            SubjectField::Recipient => present(&self.recipient_id),
            SubjectField::Doctor | SubjectField::Patient => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        texts(&[&self.title, &self.message, &self.category, &self.audience])
    }
}

/// Any record the dashboards display, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Appointment(Appointment),
    MedicalRecord(MedicalRecord),
    Notification(Notification),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Appointment(_) => RecordKind::Appointments,
            Record::MedicalRecord(_) => RecordKind::MedicalRecords,
            Record::Notification(_) => RecordKind::Notifications,
        }
    }

    fn as_filterable(&self) -> &dyn DynFilterable {
        match self {
            Record::Appointment(r) => r,
            Record::MedicalRecord(r) => r,
            Record::Notification(r) => r,
        }
    }
}

impl From<Appointment> for Record {
    fn from(value: Appointment) -> Self {
        Record::Appointment(value)
    }
}

impl From<MedicalRecord> for Record {
    fn from(value: MedicalRecord) -> Self {
        Record::MedicalRecord(value)
    }
}

impl From<Notification> for Record {
    fn from(value: Notification) -> Self {
        Record::Notification(value)
    }
}

/// Object-safe subset of [`Filterable`] for delegating from [`Record`].
trait DynFilterable {
    fn dyn_timestamp(&self) -> Option<&str>;
    fn dyn_status(&self) -> Option<&str>;
    fn dyn_subject_id(&self, field: SubjectField) -> Option<&RecordId>;
    fn dyn_search_fields(&self) -> Vec<&str>;
}

impl<T: Filterable> DynFilterable for T {
    fn dyn_timestamp(&self) -> Option<&str> {
        self.timestamp()
    }

    fn dyn_status(&self) -> Option<&str> {
        self.status()
    }

    fn dyn_subject_id(&self, field: SubjectField) -> Option<&RecordId> {
        self.subject_id(field)
    }

    fn dyn_search_fields(&self) -> Vec<&str> {
        self.search_fields()
    }
}

impl Identifiable for Record {
    fn id(&self) -> &RecordId {
        match self {
            Record::Appointment(r) => r.id(),
            Record::MedicalRecord(r) => r.id(),
            Record::Notification(r) => r.id(),
        }
    }

    fn set_id(&mut self, id: RecordId) {
        match self {
            Record::Appointment(r) => r.set_id(id),
            Record::MedicalRecord(r) => r.set_id(id),
            Record::Notification(r) => r.set_id(id),
        }
    }
}

impl Filterable for Record {
    const KNOWN_STATUSES: &'static [&'static str] = ALL_STATUSES;

    fn timestamp(&self) -> Option<&str> {
        self.as_filterable().dyn_timestamp()
    }

    fn status(&self) -> Option<&str> {
        self.as_filterable().dyn_status()
    }

    fn subject_id(&self, field: SubjectField) -> Option<&RecordId> {
        self.as_filterable().dyn_subject_id(field)
    }

    fn search_fields(&self) -> Vec<&str> {
        self.as_filterable().dyn_search_fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_fields_parse_any_casing() {
        for input in ["doctor", "doctorId", "doctor_id", "DoctorID", "doctorID"] {
            assert_eq!(
                input.parse::<SubjectField>().expect(input),
                SubjectField::Doctor
            );
        }
        assert_eq!(
            "PatientID".parse::<SubjectField>().expect("patient"),
            SubjectField::Patient
        );
        assert_eq!(
            "userId".parse::<SubjectField>().expect("user"),
            SubjectField::Recipient
        );
        assert!("nurseId".parse::<SubjectField>().is_err());
    }

    #[test]
    fn unset_subjects_are_absent() {
        let appointment = Appointment {
            doctor_id: RecordId::from("3"),
            ..Default::default()
        };
        assert_eq!(
            appointment.subject_id(SubjectField::Doctor).map(RecordId::as_str),
            Some("3")
        );
        assert_eq!(appointment.subject_id(SubjectField::Patient), None);
        assert_eq!(appointment.subject_id(SubjectField::Recipient), None);
    }

    #[test]
    fn search_fields_skip_missing_text() {
        let record = MedicalRecord {
            diagnosis: Some("Flu".into()),
            ..Default::default()
        };
        assert_eq!(record.search_fields(), vec!["Flu"]);
    }

    #[test]
    fn record_union_delegates_to_its_variant() {
        let record = Record::from(Notification {
            id: RecordId::from("n1"),
            recipient_id: RecordId::from(9_i64),
            status: Some("Draft".into()),
            created_at: Some("2025-01-01T00:00:00Z".into()),
            message: Some("Hello".into()),
            ..Default::default()
        });

        assert_eq!(record.kind(), RecordKind::Notifications);
        assert_eq!(record.id().as_str(), "n1");
        assert_eq!(record.status(), Some("Draft"));
        assert_eq!(record.timestamp(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(
            record.subject_id(SubjectField::Recipient).map(RecordId::as_str),
            Some("9")
        );
        assert_eq!(record.search_fields(), vec!["Hello"]);
    }

    #[test]
    fn record_union_serialises_with_kind_tag() {
        let record = Record::from(Appointment {
            id: RecordId::from("a1"),
            ..Default::default()
        });
        let json = serde_json::to_value(&record).expect("serialise");
        assert_eq!(json["kind"], "appointment");
        assert_eq!(json["id"], "a1");
    }
}
