//! File-backed cart mirror.

use std::path::{Path, PathBuf};

use shopici_core::cart::CartStore;
use shopici_core::error::Result;

use crate::paths::StorePaths;
use crate::storage::AtomicFile;

/// A [`CartStore`] keeping one JSON file per key in the device data
/// directory.
///
/// The store is deliberately dumb: it neither parses nor validates the
/// payload, and it never retries. The cart session owns the failure policy
/// (fall back to empty on bad reads, swallow failed writes).
pub struct JsonCartStore {
    dir: PathBuf,
}

impl JsonCartStore {
    /// Creates a store rooted at the default cart directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(StorePaths::new(None).cart_dir()?))
    }

    /// Creates a store rooted at `dir` (for testing).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> AtomicFile {
        AtomicFile::new(self.dir.join(format!("{key}.json")))
    }
}

impl CartStore for JsonCartStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.file_for(key).load()
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        self.file_for(key).save(payload)
    }
}
