//! Identity service trait and auth-change subscription handle.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::model::{AuthChange, AuthSession};
use crate::error::Result;

/// The consumed surface of the hosted identity service.
///
/// Implementations keep whatever session state the transport needs (a
/// bearer token, a refresh cookie); callers only see the operations below.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Registers a new account. The backend may require email confirmation
    /// before the first sign-in succeeds.
    async fn sign_up(&self, email: &str, password: &str) -> Result<()>;

    /// Exchanges credentials for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Revokes the current session. No-op when signed out.
    async fn sign_out(&self) -> Result<()>;

    /// The current session, if one is active.
    async fn session(&self) -> Result<Option<AuthSession>>;

    /// Changes the signed-in account's email address.
    async fn update_email(&self, new_email: &str) -> Result<()>;

    /// Subscribes to auth state transitions.
    ///
    /// The returned watcher stops receiving events when dropped; there is
    /// no separate unsubscribe call to forget.
    fn subscribe_auth_changes(&self) -> AuthWatcher;
}

/// A cancellable subscription to [`AuthChange`] events.
///
/// Holds the receiving half of the event channel plus a release hook that
/// runs exactly once, either on [`close`](Self::close) or on drop. This
/// replaces the callback-and-remember-to-unsubscribe pattern: releasing the
/// watcher is tied to its scope on every exit path.
pub struct AuthWatcher {
    receiver: mpsc::UnboundedReceiver<AuthChange>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthWatcher {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<AuthChange>,
        on_release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            on_release: Some(Box::new(on_release)),
        }
    }

    /// Waits for the next auth change. Returns `None` once the service side
    /// has gone away.
    pub async fn changed(&mut self) -> Option<AuthChange> {
        self.receiver.recv().await
    }

    /// Non-blocking poll for a pending auth change.
    pub fn try_changed(&mut self) -> Option<AuthChange> {
        self.receiver.try_recv().ok()
    }

    /// Explicitly ends the subscription.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl Drop for AuthWatcher {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for AuthWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthWatcher")
            .field("released", &self.on_release.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::model::{AuthChange, AuthSession, AuthUser};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session() -> AuthSession {
        AuthSession {
            access_token: "tok".into(),
            user: AuthUser {
                id: "u1".into(),
                email: "u1@example.com".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_watcher_receives_changes_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = AuthWatcher::new(rx, || {});

        tx.send(AuthChange::SignedIn { session: session() }).unwrap();
        tx.send(AuthChange::SignedOut).unwrap();

        assert!(matches!(
            watcher.changed().await,
            Some(AuthChange::SignedIn { .. })
        ));
        assert_eq!(watcher.changed().await, Some(AuthChange::SignedOut));
    }

    #[test]
    fn test_release_hook_runs_once_on_drop_and_close() {
        let count = Arc::new(AtomicUsize::new(0));

        let (_tx, rx) = mpsc::unbounded_channel::<AuthChange>();
        let c = count.clone();
        drop(AuthWatcher::new(rx, move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let (_tx, rx) = mpsc::unbounded_channel::<AuthChange>();
        let c = count.clone();
        AuthWatcher::new(rx, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .close();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
