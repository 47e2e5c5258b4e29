//! Profile repository trait.

use async_trait::async_trait;

use super::model::Profile;
use crate::error::Result;

/// An abstract repository over the remote `profiles` table.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Looks up a profile by user id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>>;

    /// Looks up a profile by unique username (used for username sign-in).
    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>>;

    /// Inserts or fully replaces the profile row keyed by `profile.id`.
    async fn upsert(&self, profile: &Profile) -> Result<()>;
}
