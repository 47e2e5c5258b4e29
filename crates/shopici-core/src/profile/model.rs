//! Profile domain model.

use serde::{Deserialize, Serialize};

/// A row of the remote `profiles` table.
///
/// The row id equals the identity service's user id; the email column is a
/// denormalized copy kept so that username sign-in can resolve a login
/// email without touching the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Profile {
    /// A minimal profile carrying only the identity link.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: None,
            full_name: None,
            phone: None,
            bio: None,
            address: None,
        }
    }
}
