//! Session state shared across the app.
//!
//! Holds who is signed in, or that we do not know yet. Route guarding
//! reads this; login and logout flows write it. Uses a read-write lock:
//! many concurrent readers, exclusive writes on the rare transitions.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use crate::api::User;

/// Current session as the guard sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Signed-in user, if any.
    pub user: Option<User>,
    /// True while session restore is still in flight.
    pub is_loading: bool,
}

impl Session {
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            is_loading: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

struct StoreInner {
    session: RwLock<Session>,
    /// Bumped on every transition; waiters subscribe to it.
    version: watch::Sender<u64>,
}

/// Thread-safe session holder. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// A fresh store starts in the loading state; the caller resolves it
    /// once restore finishes or is skipped.
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                session: RwLock::new(Session::loading()),
                version,
            }),
        }
    }

    pub fn current(&self) -> Session {
        self.inner
            .session
            .read()
            .expect("session lock poisoned")
            .clone()
    }

    /// Restore started; guard answers "loading" until resolved.
    pub fn begin_restore(&self) {
        self.replace(Session::loading());
        tracing::debug!("session restore started");
    }

    pub fn resolve_anonymous(&self) {
        self.replace(Session::anonymous());
        tracing::info!("session resolved: anonymous");
    }

    pub fn resolve_user(&self, user: User) {
        tracing::info!(user = user.id, is_admin = user.is_admin, "session resolved");
        self.replace(Session::authenticated(user));
    }

    /// Sign out. The store goes back to anonymous.
    pub fn clear(&self) {
        self.replace(Session::anonymous());
        tracing::info!("session cleared");
    }

    /// Wait until the session is no longer loading.
    pub async fn settled(&self) -> Session {
        let mut version = self.inner.version.subscribe();
        loop {
            let session = self.current();
            if !session.is_loading {
                return session;
            }
            if version.changed().await.is_err() {
                return self.current();
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    fn replace(&self, session: Session) {
        *self
            .inner
            .session
            .write()
            .expect("session lock poisoned") = session;
        self.inner.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}
