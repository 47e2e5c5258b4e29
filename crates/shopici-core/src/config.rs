//! Store backend configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Connection settings for the hosted backend, loaded from the user's
/// config file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the hosted backend (data, identity, storage and realtime
    /// all hang off this origin).
    pub service_url: String,
    /// Public anonymous API key; row-level policies do the real gating.
    pub anon_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
        }
    }
}

impl StoreConfig {
    /// Rejects configs that cannot possibly reach a backend.
    pub fn validate(&self) -> Result<()> {
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(StoreError::config(format!(
                "service_url must be an http(s) origin, got '{}'",
                self.service_url
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(StoreError::config("anon_key is not set"));
        }
        Ok(())
    }
}
