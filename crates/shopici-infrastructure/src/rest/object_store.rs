//! Hosted object storage adapter.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use shopici_core::error::Result;
use shopici_core::media::ObjectStore;

use super::client::{RestClient, send};

/// Uploads objects through the hosted storage API and derives their public
/// URLs.
pub struct RestObjectStore {
    client: Arc<RestClient>,
}

impl RestObjectStore {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// Public URL of an object in a public bucket.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.client
            .url(&format!("/storage/v1/object/public/{bucket}/{path}"))
    }
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let request = self
            .client
            .authed(
                self.client
                    .http()
                    .post(self.client.url(&format!("/storage/v1/object/{bucket}/{path}"))),
            )
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        RestClient::check(send(request).await?).await?;
        Ok(self.public_url(bucket, path))
    }
}
