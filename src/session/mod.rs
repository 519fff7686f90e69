//! Session store: who is logged in, and as which role.
//!
//! The store is an explicit instance handed to whoever needs it. Every
//! change is pushed through a `watch` channel so the API client, the router
//! and any open board see the same snapshot.

pub mod storage;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

pub use storage::{FileStorage, MemoryStorage, SessionStorage};
use storage::{KEY_ROLE, KEY_TOKEN, KEY_USER, KEY_USERNAME};

const SESSION_KEYS: [&str; 3] = [KEY_TOKEN, KEY_ROLE, KEY_USER];

/// Errors from durable session storage
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage at {path} failed: {message}")]
    Storage { path: PathBuf, message: String },

    #[error("Session storage is corrupt: {0}")]
    Corrupt(String),
}

/// Logged-in user profile as returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, alias = "displayName", alias = "nama")]
    pub display_name: Option<String>,
}

/// Snapshot of the caller's authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}

/// Holder of the current session, backed by durable storage
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    tx: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    /// Rebuild the session from storage. Read once, at startup.
    pub fn open(storage: Arc<dyn SessionStorage>) -> Result<Self, SessionError> {
        let token = storage.get(KEY_TOKEN)?;
        let role = storage.get(KEY_ROLE)?;
        let user = match storage.get(KEY_USER)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable stored user profile");
                    None
                }
            },
            None => None,
        };

        let session = Session { token, role, user };
        if session.is_authenticated() {
            info!(role = ?session.role, "Restored session from storage");
        }

        let (tx, _rx) = watch::channel(session);
        Ok(Self {
            storage,
            tx: Arc::new(tx),
        })
    }

    /// In-memory store with nothing persisted
    pub fn in_memory() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self {
            storage: Arc::new(MemoryStorage::new()),
            tx: Arc::new(tx),
        }
    }

    /// Persist and publish a new session.
    ///
    /// Storage is written first; if any write fails the previously stored
    /// keys are written back and the in-memory session is left untouched.
    pub fn login(&self, token: &str, role: &str, user: Option<User>) -> Result<(), SessionError> {
        let previous = self.snapshot_storage()?;
        if let Err(e) = self.persist(token, role, user.as_ref()) {
            warn!(error = %e, "Failed to persist session, rolling back");
            self.restore_storage(&previous);
            return Err(e);
        }

        info!(role = %role, "Logged in");
        self.tx.send_replace(Session {
            token: Some(token.to_string()),
            role: Some(role.to_string()),
            user,
        });
        Ok(())
    }

    /// Drop the session.
    ///
    /// Memory is cleared before storage so the process stops acting as the
    /// user even when storage cannot be cleared; that failure is still
    /// returned.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.tx.send_replace(Session::default());
        info!("Logged out");
        self.clear_storage()
    }

    /// Current snapshot
    pub fn current_session(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Change notifications
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Bearer token for outgoing requests, if any
    pub fn token(&self) -> Option<String> {
        self.tx.borrow().token.clone().filter(|t| !t.is_empty())
    }

    /// Remember the last username for the login form; survives logout
    pub fn remember_username(&self, username: &str) -> Result<(), SessionError> {
        self.storage.set(KEY_USERNAME, username)
    }

    pub fn remembered_username(&self) -> Option<String> {
        self.storage.get(KEY_USERNAME).ok().flatten()
    }

    pub fn forget_username(&self) -> Result<(), SessionError> {
        self.storage.remove(KEY_USERNAME)
    }

    fn persist(&self, token: &str, role: &str, user: Option<&User>) -> Result<(), SessionError> {
        self.storage.set(KEY_TOKEN, token)?;
        self.storage.set(KEY_ROLE, role)?;
        match user {
            Some(user) => {
                let raw =
                    serde_json::to_string(user).map_err(|e| SessionError::Corrupt(e.to_string()))?;
                self.storage.set(KEY_USER, &raw)
            }
            None => self.storage.remove(KEY_USER),
        }
    }

    fn snapshot_storage(&self) -> Result<Vec<(&'static str, Option<String>)>, SessionError> {
        SESSION_KEYS
            .iter()
            .map(|key| self.storage.get(key).map(|value| (*key, value)))
            .collect()
    }

    fn restore_storage(&self, previous: &[(&'static str, Option<String>)]) {
        for (key, value) in previous {
            let result = match value {
                Some(value) => self.storage.set(key, value),
                None => self.storage.remove(key),
            };
            if let Err(e) = result {
                warn!(key = *key, error = %e, "Failed to restore session key");
            }
        }
    }

    fn clear_storage(&self) -> Result<(), SessionError> {
        let mut first_err = None;
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!(key = key, error = %e, "Failed to clear session key");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.tx.borrow().is_authenticated())
            .finish()
    }
}
