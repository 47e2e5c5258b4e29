//! Unified path management for Shopici's device-local files.
//!
//! Only two kinds of files live on the device: the backend configuration
//! and the cart mirror blob. Everything else is remote.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/shopici/           # Config directory
//! └── config.toml              # Backend connection settings
//!
//! ~/.local/share/shopici/      # Data directory
//! └── cart/
//!     └── shopici_cart_v1.json # Mirrored cart blob
//! ```

use std::path::{Path, PathBuf};

use shopici_core::error::{Result, StoreError};

const APP_DIR_NAME: &str = "shopici";

/// Resolves the device-local directories used by the storage adapters.
///
/// A base directory override routes every path under one root, which is how
/// tests isolate themselves with a temp dir.
#[derive(Debug, Clone, Default)]
pub struct StorePaths {
    base_dir: Option<PathBuf>,
}

impl StorePaths {
    /// Creates a resolver, optionally rooted at `base_dir` (for testing).
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/shopici/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.join("config"));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| StoreError::config("cannot determine the user config directory"))
    }

    /// Returns the data directory (e.g. `~/.local/share/shopici/`).
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.join("data"));
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| StoreError::config("cannot determine the user data directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding the cart mirror blob.
    pub fn cart_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("cart"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_routes_all_paths_under_base() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::new(Some(temp_dir.path()));

        assert!(paths.config_file().unwrap().starts_with(temp_dir.path()));
        assert!(paths.cart_dir().unwrap().starts_with(temp_dir.path()));
    }

    #[test]
    fn test_config_and_data_dirs_are_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StorePaths::new(Some(temp_dir.path()));

        assert_ne!(paths.config_dir().unwrap(), paths.data_dir().unwrap());
    }
}
