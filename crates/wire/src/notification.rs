//! Canonical notification carrier.

use crate::raw::RawFields;
use crate::{FromRaw, RecordKind};
use hms_types::RecordId;
use serde::Serialize;

/// A message sent (or queued) by an administrator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    /// Single addressee, when the notification targets one user.
    pub recipient_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Broadcast group such as `All`, `Doctors` or `Patients`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

impl FromRaw for Notification {
    const KIND: RecordKind = RecordKind::Notifications;

    fn from_raw(raw: &RawFields) -> Self {
        Self {
            id: raw.id(&["id", "notificationid"]),
            recipient_id: raw.id_or_nested(&["recipientid", "userid"], "recipient"),
            title: raw.text(&["title", "subject"]),
            message: raw.text(&["message", "body", "content"]),
            audience: raw.non_empty_text(&["audience", "recipienttype", "recipients", "targetrole"]),
            category: raw.non_empty_text(&["category", "type", "notificationtype"]),
            status: raw.non_empty_text(&["status"]),
            created_at: raw.non_empty_text(&["createdat", "sentat", "date"]),
            scheduled_for: raw.non_empty_text(&["scheduledfor", "scheduledat", "scheduledtime"]),
        }
    }
}
