// Session context: the logged-in user's credentials and their persistence.
//
// A `SessionContext` is created once at startup, hydrated from a
// `SessionStore`, and handed to every component that needs the token. Only
// the auth actions write to it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use tracing::{info, warn};

/// Persisted key for the bearer token.
pub const KEY_AUTH_TOKEN: &str = "auth_token";
/// Persisted key for the user id.
pub const KEY_USER_ID: &str = "user_id";
/// Persisted key for the user's email.
pub const KEY_USER_EMAIL: &str = "user_email";

/// Credentials returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub email: String,
}

/// What the UI knows about the current user. Every field is `None` after
/// logout, mirroring the three cleared keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl CurrentUser {
    /// Name shown in the user badge: the local part of the email, or
    /// "Guest" when nobody is logged in.
    pub fn display_name(&self) -> String {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => {
                email.split('@').next().unwrap_or(email).to_string()
            }
            _ => "Guest".to_string(),
        }
    }

    /// Single uppercase initial for the badge avatar.
    pub fn initials(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Durable storage for the three session keys.
pub trait SessionStore: Send + Sync {
    /// Read a single key.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write a single key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove a single key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store used by tests and when no database is available.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().expect("session store mutex poisoned")
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

struct Inner {
    current: Mutex<Option<Session>>,
    store: Arc<dyn SessionStore>,
}

/// Shared handle to the current session. Cloning is cheap; all clones see
/// the same state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionContext {
    /// Build a context from whatever the store holds. A stored session is
    /// restored only when the token is present; missing user id or email
    /// become empty strings.
    pub fn hydrate(store: Arc<dyn SessionStore>) -> Result<Self> {
        let token = store.get(KEY_AUTH_TOKEN)?.filter(|t| !t.is_empty());
        let current = match token {
            Some(token) => {
                let user_id = store.get(KEY_USER_ID)?.unwrap_or_default();
                let email = store.get(KEY_USER_EMAIL)?.unwrap_or_default();
                info!("Restored session for user {}", user_id);
                Some(Session {
                    token,
                    user_id,
                    email,
                })
            }
            None => None,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                current: Mutex::new(current),
                store,
            }),
        })
    }

    /// An empty context backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                current: Mutex::new(None),
                store: Arc::new(MemorySessionStore::new()),
            }),
        }
    }

    fn current(&self) -> MutexGuard<'_, Option<Session>> {
        self.inner
            .current
            .lock()
            .expect("session context mutex poisoned")
    }

    /// Record a fresh login, writing all three keys through to the store.
    /// The in-memory session is updated even when persisting fails so the
    /// running client stays logged in.
    pub fn establish(&self, session: Session) -> Result<()> {
        let store = &self.inner.store;
        let persisted = store
            .set(KEY_AUTH_TOKEN, &session.token)
            .and_then(|_| store.set(KEY_USER_ID, &session.user_id))
            .and_then(|_| store.set(KEY_USER_EMAIL, &session.email));
        *self.current() = Some(session);
        persisted
    }

    /// Forget the session in memory and remove all three keys from the
    /// store.
    pub fn clear(&self) -> Result<()> {
        *self.current() = None;
        let store = &self.inner.store;
        let mut first_err = None;
        for key in [KEY_AUTH_TOKEN, KEY_USER_ID, KEY_USER_EMAIL] {
            if let Err(e) = store.remove(key) {
                warn!("Failed to remove session key {}: {}", key, e);
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.current().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn current_user(&self) -> CurrentUser {
        match self.current().as_ref() {
            Some(s) => CurrentUser {
                token: Some(s.token.clone()),
                user_id: Some(s.user_id.clone()),
                email: Some(s.email.clone()),
            },
            None => CurrentUser::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
