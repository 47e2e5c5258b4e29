//! In-memory identity service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use shopici_core::auth::{AuthChange, AuthSession, AuthUser, AuthWatcher, IdentityService};
use shopici_core::error::{Result, StoreError};

#[derive(Clone)]
struct Account {
    user_id: String,
    password: String,
}

/// An [`IdentityService`] holding accounts and the active session in
/// memory. Suitable for tests and demo mode only; passwords are compared
/// in plain text and nothing survives the process.
#[derive(Clone, Default)]
pub struct MemoryIdentityService {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    session: Arc<RwLock<Option<AuthSession>>>,
    watchers: Arc<Mutex<Vec<(u64, mpsc::UnboundedSender<AuthChange>)>>>,
    next_watcher_id: Arc<AtomicU64>,
}

impl MemoryIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account up-front and returns its user id (test setup).
    pub fn with_account(self, email: &str, password: &str) -> (Self, String) {
        let user_id = Uuid::new_v4().to_string();
        self.accounts.write().unwrap().insert(
            email.to_string(),
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        (self, user_id)
    }

    fn emit(&self, change: AuthChange) {
        let mut watchers = self.watchers.lock().unwrap();
        watchers.retain(|(_, sender)| sender.send(change.clone()).is_ok());
    }
}

#[async_trait]
impl IdentityService for MemoryIdentityService {
    async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(StoreError::validation("email already registered"));
        }
        accounts.insert(
            email.to_string(),
            Account {
                user_id: Uuid::new_v4().to_string(),
                password: password.to_string(),
            },
        );
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let account = {
            let accounts = self.accounts.read().unwrap();
            accounts.get(email).cloned()
        };
        let Some(account) = account else {
            return Err(StoreError::security("invalid login credentials"));
        };
        if account.password != password {
            return Err(StoreError::security("invalid login credentials"));
        }

        let session = AuthSession {
            access_token: Uuid::new_v4().to_string(),
            user: AuthUser {
                id: account.user_id,
                email: email.to_string(),
            },
        };
        *self.session.write().unwrap() = Some(session.clone());
        self.emit(AuthChange::SignedIn {
            session: session.clone(),
        });
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let had_session = self.session.write().unwrap().take().is_some();
        if had_session {
            self.emit(AuthChange::SignedOut);
        }
        Ok(())
    }

    async fn session(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.read().unwrap().clone())
    }

    async fn update_email(&self, new_email: &str) -> Result<()> {
        let Some(mut session) = self.session.read().unwrap().clone() else {
            return Err(StoreError::security("not signed in"));
        };

        {
            let mut accounts = self.accounts.write().unwrap();
            if let Some(account) = accounts.remove(&session.user.email) {
                accounts.insert(new_email.to_string(), account);
            }
        }

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

impl std::fmt::Debug for MemoryIdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIdentityService")
            .field("accounts", &self.accounts.read().unwrap().len())
            .field("signed_in", &self.session.read().unwrap().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_requires_matching_password() {
        let (identity, _) = MemoryIdentityService::new().with_account("a@example.com", "pw");

        assert!(
            identity
                .sign_in_with_password("a@example.com", "wrong")
                .await
                .unwrap_err()
                .is_security()
        );
        let session = identity
            .sign_in_with_password("a@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(session.user.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_watcher_sees_sign_in_and_out() {
        let (identity, _) = MemoryIdentityService::new().with_account("a@example.com", "pw");
        let mut watcher = identity.subscribe_auth_changes();

        identity
            .sign_in_with_password("a@example.com", "pw")
            .await
            .unwrap();
        identity.sign_out().await.unwrap();

        assert!(matches!(
            watcher.changed().await,
            Some(AuthChange::SignedIn { .. })
        ));
        assert_eq!(watcher.changed().await, Some(AuthChange::SignedOut));
    }

    #[tokio::test]
    async fn test_sign_out_when_signed_out_is_silent() {
        let identity = MemoryIdentityService::new();
        let mut watcher = identity.subscribe_auth_changes();

        identity.sign_out().await.unwrap();

        assert!(watcher.try_changed().is_none());
    }

    #[tokio::test]
    async fn test_update_email_rekeys_account() {
        let (identity, _) = MemoryIdentityService::new().with_account("old@example.com", "pw");
        identity
            .sign_in_with_password("old@example.com", "pw")
            .await
            .unwrap();

        identity.update_email("new@example.com").await.unwrap();
        identity.sign_out().await.unwrap();

        assert!(
            identity
                .sign_in_with_password("new@example.com", "pw")
                .await
                .is_ok()
        );
    }
}
