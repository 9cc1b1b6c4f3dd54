//! Canonical medical record carrier.

use crate::raw::RawFields;
use crate::{FromRaw, RecordKind};
use hms_types::RecordId;
use serde::Serialize;

/// A clinical entry written by a doctor for a patient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub doctor_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FromRaw for MedicalRecord {
    const KIND: RecordKind = RecordKind::MedicalRecords;

    fn from_raw(raw: &RawFields) -> Self {
        Self {
            id: raw.id(&["id", "recordid", "medicalrecordid"]),
            patient_id: raw.id_or_nested(&["patientid"], "patient"),
            doctor_id: raw.id_or_nested(&["doctorid"], "doctor"),
            patient_name: raw.text_or_nested(&["patientname"], "patient"),
            doctor_name: raw.text_or_nested(&["doctorname"], "doctor"),
            date: raw.non_empty_text(&["date", "recorddate", "visitdate", "createdat"]),
            diagnosis: raw.text(&["diagnosis"]),
            treatment: raw.text(&["treatment"]),
            prescription: raw.text(&["prescription", "prescriptions"]),
            notes: raw.text(&["notes", "note"]),
        }
    }
}
