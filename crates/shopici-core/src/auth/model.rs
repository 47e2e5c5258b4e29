//! Session and auth-event models.

use serde::{Deserialize, Serialize};

/// The authenticated principal attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// An issued session as returned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token sent with authenticated backend requests.
    pub access_token: String,
    pub user: AuthUser,
}

/// Auth state transitions delivered to subscribed watchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthChange {
    SignedIn { session: AuthSession },
    SignedOut,
}
