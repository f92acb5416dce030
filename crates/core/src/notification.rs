//! In-app notifications.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    /// Free-form category (`incident_assigned`, `action_due`, ...).
    #[serde(default)]
    pub kind: Option<String>,
    /// Dashboard path the notification points at.
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub count: u64,
}

/// Count unread notifications in a fetched page.
pub fn unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}
