//! Shared HTTP client for the hosted backend.

use std::sync::RwLock;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use shopici_core::config::StoreConfig;
use shopici_core::error::{Result, StoreError};

/// HTTP client carrying the backend origin, the public anon key and the
/// current session's bearer token.
///
/// Every request sends the anon key in the `apikey` header; the bearer
/// token defaults to the anon key until a session token is installed after
/// sign-in. Row-level policies on the backend do the actual authorization.
pub struct RestClient {
    http: Client,
    base_url: String,
    anon_key: String,
    bearer: RwLock<Option<String>>,
}

impl RestClient {
    /// Creates a client from validated connection settings.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http: Client::new(),
            base_url: config.service_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            bearer: RwLock::new(None),
        })
    }

    /// Installs the session token used as the bearer for subsequent
    /// requests.
    pub fn install_session_token(&self, token: impl Into<String>) {
        *self.bearer.write().unwrap() = Some(token.into());
    }

    /// Reverts to anonymous requests.
    pub fn clear_session_token(&self) {
        *self.bearer.write().unwrap() = None;
    }

    /// Absolute URL under the backend origin.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attaches the `apikey` and bearer headers.
    pub(crate) fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .bearer
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// `GET /rest/v1/{table}` with PostgREST query parameters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self
            .authed(self.http.get(self.url(&format!("/rest/v1/{table}"))))
            .query(&[("select", "*")])
            .query(query);
        let response = Self::check(send(request).await?).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::data_access(format!("failed to decode {table} rows: {e}")))
    }

    /// `POST /rest/v1/{table}` returning the stored representation.
    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T> {
        let request = self
            .authed(self.http.post(self.url(&format!("/rest/v1/{table}"))))
            .header("Prefer", "return=representation")
            .json(body);
        let response = Self::check(send(request).await?).await?;
        let mut rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| StoreError::data_access(format!("failed to decode {table} row: {e}")))?;
        if rows.is_empty() {
            return Err(StoreError::data_access(format!(
                "insert into {table} returned no representation"
            )));
        }
        Ok(rows.remove(0))
    }

    /// `POST /rest/v1/{table}` with merge-duplicates resolution.
    pub async fn upsert<B: Serialize>(&self, table: &str, body: &B) -> Result<()> {
        let request = self
            .authed(self.http.post(self.url(&format!("/rest/v1/{table}"))))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(body);
        Self::check(send(request).await?).await?;
        Ok(())
    }

    /// `PATCH /rest/v1/{table}` over the rows selected by `query`.
    pub async fn update<B: Serialize>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<()> {
        let request = self
            .authed(self.http.patch(self.url(&format!("/rest/v1/{table}"))))
            .query(query)
            .json(body);
        Self::check(send(request).await?).await?;
        Ok(())
    }

    /// `DELETE /rest/v1/{table}` over the rows selected by `query`.
    pub async fn delete(&self, table: &str, query: &[(&str, String)]) -> Result<()> {
        let request = self
            .authed(self.http.delete(self.url(&format!("/rest/v1/{table}"))))
            .query(query);
        Self::check(send(request).await?).await?;
        Ok(())
    }

    /// Maps non-2xx responses to a typed backend error.
    pub(crate) async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::backend(status.as_u16(), body))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    request
        .send()
        .await
        .map_err(|e| StoreError::data_access(format!("request failed: {e}")))
}

/// PostgREST equality filter value (`eq.<value>`).
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StoreConfig {
        StoreConfig {
            service_url: "https://abc.supabase.co/".into(),
            anon_key: "anon".into(),
        }
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = RestClient::new(&config()).unwrap();
        assert_eq!(
            client.url("/rest/v1/products"),
            "https://abc.supabase.co/rest/v1/products"
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = StoreConfig {
            service_url: "abc.supabase.co".into(),
            anon_key: "anon".into(),
        };
        assert!(RestClient::new(&bad).is_err());
    }

    #[test]
    fn test_eq_filter_format() {
        assert_eq!(eq("p1"), "eq.p1");
    }
}
