//! Notification repository trait.

use async_trait::async_trait;

use super::model::{NewNotification, Notification};
use crate::error::Result;

/// An abstract repository over the remote `notifications` table.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// All notifications for a user, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>>;

    /// Inserts a draft and returns the stored row with its assigned id.
    async fn insert(&self, draft: &NewNotification) -> Result<Notification>;

    /// Marks one notification as read. No-op if already read.
    async fn mark_read(&self, id: &str) -> Result<()>;
}
