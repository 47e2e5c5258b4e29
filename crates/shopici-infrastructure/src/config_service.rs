//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the backend connection
//! settings from the configuration file (~/.config/shopici/config.toml).

use std::sync::{Arc, RwLock};

use shopici_core::config::StoreConfig;
use shopici_core::error::Result;

use crate::paths::StorePaths;
use crate::storage::AtomicFile;

/// Loads and caches the store configuration.
///
/// The file is read once on first access and cached; a missing file is
/// created with defaults so the user has something to edit.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: StorePaths,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<StoreConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService reading from the default location.
    ///
    /// The configuration is loaded lazily on first access to avoid blocking
    /// during initialization.
    pub fn new() -> Self {
        Self::with_paths(StorePaths::new(None))
    }

    /// Creates a ConfigService reading under the given path root (for
    /// testing).
    pub fn with_paths(paths: StorePaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the store configuration, loading from file if not cached.
    pub fn get_config(&self) -> StoreConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_default();

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<StoreConfig> {
        let file = AtomicFile::new(self.paths.config_file()?);

        match file.load()? {
            Some(content) => Ok(toml::from_str(&content)?),
            None => {
                // First run: write a default file for the user to fill in.
                let default_config = StoreConfig::default();
                file.save(&toml::to_string_pretty(&default_config)?)?;
                Ok(default_config)
            }
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
