use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// The signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// Session notifications pushed by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}

pub type AuthHandler = Box<dyn Fn(AuthEvent) + Send + Sync>;

/// Handle to an auth event listener
///
/// `cancel` consumes the handle, so a listener is removed at most once.
/// Dropping the handle without cancelling leaves the listener registered.
#[must_use = "dropping a Subscription leaves the listener registered"]
pub struct Subscription {
    cancel: Box<dyn FnOnce() + Send>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    pub fn cancel(self) {
        (self.cancel)()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// External identity provider
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// The user of the active session, if any
    async fn current_user(&self) -> Option<User>;

    /// End the active session; listeners receive [`AuthEvent::SignedOut`]
    async fn sign_out(&self) -> AppResult<()>;

    /// Register `handler` for session notifications
    fn subscribe(&self, handler: AuthHandler) -> Subscription;
}

#[derive(Default)]
struct AuthInner {
    user: Option<User>,
    listeners: HashMap<u64, Arc<dyn Fn(AuthEvent) + Send + Sync>>,
    next_listener_id: u64,
}

/// Process-local session store used for the demo deployment and in tests
#[derive(Clone, Default)]
pub struct InMemoryAuth {
    inner: Arc<Mutex<AuthInner>>,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        let auth = Self::new();
        auth.lock().user = Some(user);
        auth
    }

    /// Start a session for `user` and notify listeners
    pub fn sign_in(&self, user: User) {
        self.lock().user = Some(user.clone());
        tracing::info!(user_id = %user.id, "User signed in");
        self.notify(AuthEvent::SignedIn(user));
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, AuthInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, event: AuthEvent) {
        // Handlers run outside the lock so they may call back into the provider
        let handlers: Vec<_> = self.lock().listeners.values().cloned().collect();
        for handler in handlers {
            handler(event.clone());
        }
    }
}

#[async_trait::async_trait]
impl AuthProvider for InMemoryAuth {
    async fn current_user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    async fn sign_out(&self) -> AppResult<()> {
        let previous = self.lock().user.take();
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "User signed out");
        }
        self.notify(AuthEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self, handler: AuthHandler) -> Subscription {
        let id = {
            let mut inner = self.lock();
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.insert(id, Arc::from(handler));
            id
        };

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                inner.listeners.remove(&id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<AuthEvent>>>, AuthHandler) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let handler: AuthHandler = Box::new(move |event| sink.lock().unwrap().push(event));
        (events, handler)
    }

    #[tokio::test]
    async fn test_with_user_reports_current_user() {
        let auth = InMemoryAuth::with_user(User::new("user-1"));
        assert_eq!(auth.current_user().await, Some(User::new("user-1")));
    }

    #[tokio::test]
    async fn test_listeners_receive_sign_in_and_sign_out() {
        let auth = InMemoryAuth::new();
        let (events, handler) = recorder();
        let subscription = auth.subscribe(handler);

        auth.sign_in(User::new("user-2"));
        auth.sign_out().await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![AuthEvent::SignedIn(User::new("user-2")), AuthEvent::SignedOut]
        );
        assert_eq!(auth.current_user().await, None);
        subscription.cancel();
    }

    #[tokio::test]
    async fn test_cancelled_subscription_stops_delivery() {
        let auth = InMemoryAuth::new();
        let (events, handler) = recorder();
        let subscription = auth.subscribe(handler);
        assert_eq!(auth.listener_count(), 1);

        subscription.cancel();
        assert_eq!(auth.listener_count(), 0);

        auth.sign_in(User::new("user-3"));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_after_provider_dropped_is_harmless() {
        let auth = InMemoryAuth::new();
        let (_events, handler) = recorder();
        let subscription = auth.subscribe(handler);
        drop(auth);
        subscription.cancel();
    }
}
