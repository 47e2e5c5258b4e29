//! Notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the remote `notifications` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Recipient user id.
    pub user_id: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Draft for creating a notification; the backend assigns id, timestamp and
/// the initial unread state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: String,
    pub body: String,
}
