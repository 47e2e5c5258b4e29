//! Account flows: sign-up, sign-in, profile management.

use std::sync::Arc;

use tracing::debug;

use shopici_core::auth::{AuthSession, AuthWatcher, IdentityService};
use shopici_core::error::{Result, StoreError};
use shopici_core::profile::{Profile, ProfileRepository};

/// Editable profile fields submitted by the profile screen.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
}

/// Use case behind the sign-up, login and profile screens.
pub struct AccountUseCase {
    identity: Arc<dyn IdentityService>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AccountUseCase {
    pub fn new(identity: Arc<dyn IdentityService>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { identity, profiles }
    }

    /// Registers a new account after checking the password confirmation.
    pub async fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<()> {
        if password != confirm {
            return Err(StoreError::validation("passwords do not match"));
        }
        self.identity.sign_up(email, password).await
    }

    /// Signs in with either an email address or a username.
    ///
    /// A credential containing `@` is taken as the login email directly.
    /// Anything else is resolved through the profile table: username to
    /// profile, profile to its stored email.
    pub async fn sign_in(&self, credential: &str, password: &str) -> Result<AuthSession> {
        let email = self.resolve_login_email(credential).await?;
        self.identity.sign_in_with_password(&email, password).await
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.identity.sign_out().await
    }

    /// The signed-in user's profile row, if one has been created yet.
    pub async fn current_profile(&self) -> Result<Option<Profile>> {
        let session = self.require_session().await?;
        self.profiles.find_by_id(&session.user.id).await
    }

    /// Saves the profile screen: pushes an email change through the
    /// identity service, then upserts the profile row keyed by the session
    /// user id.
    pub async fn save_profile(&self, update: ProfileUpdate) -> Result<()> {
        let session = self.require_session().await?;

        if update.email != session.user.email {
            self.identity.update_email(&update.email).await?;
            debug!(user_id = %session.user.id, "login email updated");
        }

        let profile = Profile {
            id: session.user.id,
            username: update.username,
            email: Some(update.email),
            full_name: update.full_name,
            phone: update.phone,
            bio: update.bio,
            address: update.address,
        };
        self.profiles.upsert(&profile).await
    }

    /// Subscribes to auth state transitions (navbar session indicator).
    pub fn watch_auth(&self) -> AuthWatcher {
        self.identity.subscribe_auth_changes()
    }

    async fn resolve_login_email(&self, credential: &str) -> Result<String> {
        if credential.contains('@') {
            return Ok(credential.to_string());
        }

        let profile = self
            .profiles
            .find_by_username(credential)
            .await?
            .ok_or_else(|| StoreError::not_found("user", credential))?;

        profile
            .email
            .ok_or_else(|| StoreError::not_found("login email", credential))
    }

    async fn require_session(&self) -> Result<AuthSession> {
        self.identity
            .session()
            .await?
            .ok_or_else(|| StoreError::security("not signed in"))
    }
}
