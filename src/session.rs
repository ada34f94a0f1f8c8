//! Per-session in-memory state.
//!
//! Each browser session owns a [`SessionState`] holding the latest edited
//! text for every card it has seen, plus the last upload batch so the OCR
//! panel can be re-rendered after a save. Nothing here is evicted; state
//! lives until the process exits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::error::AppResult;
use crate::services::upload::BatchItem;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "ocrdesk_session";

/// Latest text per UI key.
#[derive(Debug, Default, Clone)]
pub struct SessionTextCache {
    texts: HashMap<String, String>,
}

impl SessionTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for `key`, seeding it with `default` on first use.
    pub fn get_or_init(&mut self, key: &str, default: impl Into<String>) -> String {
        self.texts
            .entry(key.to_string())
            .or_insert_with(|| default.into())
            .clone()
    }

    /// Like [`get_or_init`](Self::get_or_init) but only computes the default
    /// when the key is missing. A failing loader leaves the cache untouched.
    pub fn get_or_try_init<F>(&mut self, key: &str, load: F) -> AppResult<String>
    where
        F: FnOnce() -> AppResult<String>,
    {
        if let Some(value) = self.texts.get(key) {
            return Ok(value.clone());
        }
        let value = load()?;
        self.texts.insert(key.to_string(), value.clone());
        Ok(value)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.texts.insert(key.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Everything one session keeps between requests.
#[derive(Debug, Default)]
pub struct SessionState {
    pub texts: SessionTextCache,
    /// Results of the most recent upload, shown again on the OCR panel.
    pub last_batch: Vec<BatchItem>,
}

/// All live sessions, keyed by session id.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the state of session `id`, creating it if needed.
    pub fn session(&self, id: &str) -> Arc<Mutex<SessionState>> {
        if let Ok(guard) = self.sessions.read() {
            if let Some(state) = guard.get(id) {
                return state.clone();
            }
        }

        let mut guard = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!("New session {}", id);
                Arc::new(Mutex::new(SessionState::default()))
            })
            .clone()
    }

    /// Run `f` with exclusive access to session `id`.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let handle = self.session(id);
        let mut state = lock_state(&handle);
        f(&mut state)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lock a session, recovering the state if a previous holder panicked.
fn lock_state(handle: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    handle.lock().unwrap_or_else(|e| e.into_inner())
}
