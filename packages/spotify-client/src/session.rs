//! Session token service
//!
//! The catalog client never refreshes tokens itself; it reads the current
//! access token from a [`TokenProvider`] collaborator on every request.
//! [`SessionStore`] is the default provider: an explicitly constructed
//! service object owned by the host application, updated by whatever
//! performs the OAuth flow, with observer subscriptions instead of global
//! mutable state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

/// A bearer access token for the catalog service
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
}

impl AccessToken {
    /// Wrap a raw token string
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Get the raw token value for the Authorization header
    pub fn as_str(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of access tokens for outbound catalog calls
///
/// Implementations own refresh/expiry; the client only ever reads.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get the current access token, if any
    async fn access_token(&self) -> Option<AccessToken>;
}

/// A provider that always returns the same token (tests, CLI runs)
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Create a provider for a fixed token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Option<AccessToken> {
        Some(self.token.clone())
    }
}

/// Callback invoked when the session token changes
pub type SessionObserver = Box<dyn Fn(Option<&AccessToken>) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`]; pass it back to
/// [`SessionStore::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Shared session state with explicit observer subscriptions
///
/// Constructed once at application start and passed by reference to
/// whatever needs it.
pub struct SessionStore {
    token: RwLock<Option<AccessToken>>,
    observers: Mutex<Vec<(SubscriptionId, Arc<SessionObserver>)>>,
    next_id: AtomicU64,
}

impl SessionStore {
    /// Create an empty session (no token yet)
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Replace the current token and notify observers
    pub fn set_token(&self, token: AccessToken) {
        {
            let mut guard = self.token.write().expect("session lock poisoned");
            *guard = Some(token.clone());
        }
        self.notify(Some(&token));
    }

    /// Clear the current token (logout) and notify observers
    pub fn clear(&self) {
        {
            let mut guard = self.token.write().expect("session lock poisoned");
            *guard = None;
        }
        self.notify(None);
    }

    /// Get a snapshot of the current token
    pub fn current(&self) -> Option<AccessToken> {
        self.token.read().expect("session lock poisoned").clone()
    }

    /// Register an observer for token changes
    pub fn subscribe(&self, observer: SessionObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .expect("observer lock poisoned")
            .push((id, Arc::new(observer)));
        id
    }

    /// Remove a previously registered observer
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers
            .lock()
            .expect("observer lock poisoned")
            .retain(|(existing, _)| *existing != id);
    }

    fn notify(&self, token: Option<&AccessToken>) {
        // Snapshot under the lock, invoke outside it: observers may call
        // subscribe/unsubscribe on this store from inside the callback.
        let snapshot: Vec<Arc<SessionObserver>> = {
            let observers = self.observers.lock().expect("observer lock poisoned");
            observers.iter().map(|(_, o)| Arc::clone(o)).collect()
        };
        for observer in snapshot {
            observer(token);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_token = self.current().is_some();
        f.debug_struct("SessionStore")
            .field("has_token", &has_token)
            .finish()
    }
}

#[async_trait]
impl TokenProvider for SessionStore {
    async fn access_token(&self) -> Option<AccessToken> {
        self.current()
    }
}
