//! GoTrue-backed identity service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use shopici_core::auth::{AuthChange, AuthSession, AuthUser, AuthWatcher, IdentityService};
use shopici_core::error::{Result, StoreError};

use super::client::{RestClient, send};

/// Identity service speaking the hosted auth endpoints.
///
/// The session is client-local: sign-in installs the access token into the
/// shared [`RestClient`] so data requests run as the signed-in user, and
/// auth-change events are emitted to watchers from this client's own calls
/// (the hosted service does not push them).
pub struct RestIdentityService {
    client: Arc<RestClient>,
    session: RwLock<Option<AuthSession>>,
    watchers: Arc<Mutex<Vec<(u64, mpsc::UnboundedSender<AuthChange>)>>>,
    next_watcher_id: AtomicU64,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl RestIdentityService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self {
            client,
            session: RwLock::new(None),
            watchers: Arc::new(Mutex::new(Vec::new())),
            next_watcher_id: AtomicU64::new(0),
        }
    }

    fn emit(&self, change: AuthChange) {
        let mut watchers = self.watchers.lock().unwrap();
        watchers.retain(|(_, sender)| sender.send(change.clone()).is_ok());
    }

    fn current_session(&self) -> Option<AuthSession> {
        self.session.read().unwrap().clone()
    }
}

#[async_trait]
impl IdentityService for RestIdentityService {
    async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        let request = self
            .client
            .authed(self.client.http().post(self.client.url("/auth/v1/signup")))
            .json(&CredentialsBody { email, password });
        RestClient::check(send(request).await?).await?;
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = self
            .client
            .authed(self.client.http().post(self.client.url("/auth/v1/token")))
            .query(&[("grant_type", "password")])
            .json(&CredentialsBody { email, password });
        let response = RestClient::check(send(request).await?).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::data_access(format!("failed to decode session: {e}")))?;

        let session = AuthSession {
            access_token: token.access_token,
            user: AuthUser {
                id: token.user.id,
                email: token.user.email.unwrap_or_else(|| email.to_string()),
            },
        };

        self.client.install_session_token(session.access_token.as_str());
        *self.session.write().unwrap() = Some(session.clone());
        debug!(user_id = %session.user.id, "signed in");
        self.emit(AuthChange::SignedIn {
            session: session.clone(),
        });
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        if self.current_session().is_none() {
            return Ok(());
        }

        let request = self
            .client
            .authed(self.client.http().post(self.client.url("/auth/v1/logout")));
        RestClient::check(send(request).await?).await?;

        *self.session.write().unwrap() = None;
        self.client.clear_session_token();
        self.emit(AuthChange::SignedOut);
        Ok(())
    }

    async fn session(&self) -> Result<Option<AuthSession>> {
        Ok(self.current_session())
    }

    async fn update_email(&self, new_email: &str) -> Result<()> {
        let Some(mut session) = self.current_session() else {
            return Err(StoreError::security("not signed in"));
        };

        let request = self
            .client
            .authed(self.client.http().put(self.client.url("/auth/v1/user")))
            .json(&serde_json::json!({ "email": new_email }));
        RestClient::check(send(request).await?).await?;

        session.user.email = new_email.to_string();
        *self.session.write().unwrap() = Some(session);
        Ok(())
    }

    fn subscribe_auth_changes(&self) -> AuthWatcher {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_watcher_id.fetch_add(1, Ordering::Relaxed);
        self.watchers.lock().unwrap().push((id, tx));

        let watchers = Arc::clone(&self.watchers);
        AuthWatcher::new(rx, move || {
            watchers.lock().unwrap().retain(|(wid, _)| *wid != id);
        })
    }
}

impl std::fmt::Debug for RestIdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestIdentityService")
            .field("signed_in", &self.session.read().unwrap().is_some())
            .finish()
    }
}
