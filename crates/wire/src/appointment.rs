//! Canonical appointment carrier.

use crate::raw::RawFields;
use crate::{FromRaw, RecordKind};
use hms_types::RecordId;
use serde::Serialize;

/// An appointment between a doctor and a patient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: RecordId,
    pub doctor_id: RecordId,
    pub patient_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    /// ISO-8601 start time as sent by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FromRaw for Appointment {
    const KIND: RecordKind = RecordKind::Appointments;

    fn from_raw(raw: &RawFields) -> Self {
        Self {
            id: raw.id(&["id", "appointmentid"]),
            doctor_id: raw.id_or_nested(&["doctorid"], "doctor"),
            patient_id: raw.id_or_nested(&["patientid"], "patient"),
            doctor_name: raw.text_or_nested(&["doctorname"], "doctor"),
            patient_name: raw.text_or_nested(&["patientname"], "patient"),
            date_time: raw.non_empty_text(&[
                "datetime",
                "appointmentdatetime",
                "appointmentdate",
                "scheduledat",
                "date",
            ]),
            status: raw.non_empty_text(&["status", "appointmentstatus"]),
            reason: raw.text(&["reason", "reasonforvisit"]),
            notes: raw.text(&["notes", "note"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_pascal_case_payload() {
        let raw = RawFields::from_value(json!({
            "ID": 10,
            "DoctorID": 1,
            "PatientID": "p-2",
            "DateTime": "2025-06-25T09:30:00Z",
            "Status": "Accepted",
            "Reason": "Follow-up"
        }))
        .expect("object");

        let appointment = Appointment::from_raw(&raw);
        assert_eq!(appointment.id.as_str(), "10");
        assert_eq!(appointment.doctor_id.as_str(), "1");
        assert_eq!(appointment.patient_id.as_str(), "p-2");
        assert_eq!(appointment.date_time.as_deref(), Some("2025-06-25T09:30:00Z"));
        assert_eq!(appointment.status.as_deref(), Some("Accepted"));
        assert_eq!(appointment.reason.as_deref(), Some("Follow-up"));
    }

    #[test]
    fn reads_names_from_nested_objects() {
        let raw = RawFields::from_value(json!({
            "id": 1,
            "doctor": {"id": 5, "name": "Dr House"},
            "patient": {"_id": "abc", "fullName": "Jane Roe"}
        }))
        .expect("object");

        let appointment = Appointment::from_raw(&raw);
        assert_eq!(appointment.doctor_id.as_str(), "5");
        assert_eq!(appointment.doctor_name.as_deref(), Some("Dr House"));
        assert_eq!(appointment.patient_id.as_str(), "abc");
        assert_eq!(appointment.patient_name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn missing_fields_default() {
        let raw = RawFields::from_value(json!({"id": 1})).expect("object");
        let appointment = Appointment::from_raw(&raw);
        assert!(appointment.doctor_id.is_empty());
        assert_eq!(appointment.date_time, None);
        assert_eq!(appointment.reason, None);
    }
}
