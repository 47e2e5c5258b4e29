//! In-memory object store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use shopici_core::error::Result;
use shopici_core::media::ObjectStore;

/// An [`ObjectStore`] keeping uploaded bytes in memory and minting
/// deterministic public URLs. Test/demo use only.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under `bucket/path`, if any (test observability).
    pub fn stored(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(&format!("{bucket}/{path}"))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        let key = format!("{bucket}/{path}");
        self.objects.write().unwrap().insert(key.clone(), bytes);
        Ok(format!("memory://{key}"))
    }
}
