//! Session credentials
//!
//! The bearer token, the user's email and the cached profile live in a small
//! key-value store under fixed keys. The store is pluggable so that a CLI can
//! keep the session on disk while tests and embedded uses keep it in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "authToken";
/// Key holding the signed-in user's email
pub const EMAIL_KEY: &str = "userEmail";
/// Key holding the serialized user profile
pub const PROFILE_KEY: &str = "userProfile";

const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, EMAIL_KEY, PROFILE_KEY];

/// Key-value storage backing the session
pub trait SessionStore: Send + Sync {
    /// Reads a value
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value, replacing any previous one
    fn set(&self, key: &str, value: &str);

    /// Removes a value if present
    fn remove(&self, key: &str);

    /// Removes several values as one operation
    fn remove_all(&self, keys: &[&str]) {
        for key in keys {
            self.remove(key);
        }
    }
}

/// In-memory implementation of SessionStore
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }

    fn remove_all(&self, keys: &[&str]) {
        let mut values = self.values.lock().unwrap();
        for key in keys {
            values.remove(*key);
        }
    }
}

/// SessionStore persisted as a JSON object in a file
///
/// The file is read once on open and rewritten after every change. Write
/// failures are logged and the in-memory copy stays authoritative for the
/// rest of the process.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Opens the store at `path`; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read(&path) {
            Ok(raw) => serde_json::from_slice(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed session file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let raw = serde_json::to_vec_pretty(values)?;
            std::fs::write(&self.path, raw)
        })();

        if let Err(e) = result {
            warn!("Failed to write session file {}: {}", self.path.display(), e);
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        self.remove_all(&[key]);
    }

    fn remove_all(&self, keys: &[&str]) {
        let mut values = self.values.lock().unwrap();
        for key in keys {
            values.remove(*key);
        }
        self.persist(&values);
    }
}

/// Typed view over the session keys of a store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn email(&self) -> Option<String> {
        self.store.get(EMAIL_KEY).filter(|e| !e.is_empty())
    }

    /// The stored profile, or `None` if absent or not valid JSON
    pub fn profile(&self) -> Option<serde_json::Value> {
        self.store
            .get(PROFILE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    /// Records a successful login
    pub fn establish(&self, token: &str, email: &str, profile: &serde_json::Value) {
        self.store.set(TOKEN_KEY, token);
        self.store.set(EMAIL_KEY, email);
        self.store.set(PROFILE_KEY, &profile.to_string());
    }

    /// Drops every session key at once
    pub fn clear(&self) {
        self.store.remove_all(&SESSION_KEYS);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token().is_some())
            .field("email", &self.email())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_establish_and_clear() {
        let session = Session::new(Arc::new(MemorySessionStore::new()));
        session.establish("T", "a@b.com", &serde_json::json!({ "name": "Ana" }));

        assert_eq!(session.token().as_deref(), Some("T"));
        assert_eq!(session.email().as_deref(), Some("a@b.com"));
        assert_eq!(session.profile().unwrap()["name"], "Ana");

        session.clear();
        assert!(session.token().is_none());
        assert!(session.email().is_none());
        assert!(session.profile().is_none());
    }

    #[test]
    fn test_clear_token_keeps_identity() {
        let session = Session::new(Arc::new(MemorySessionStore::new()));
        session.establish("T", "a@b.com", &serde_json::Value::Null);
        session.clear_token();

        assert!(session.token().is_none());
        assert_eq!(session.email().as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path);
        store.set(TOKEN_KEY, "abc");
        store.set(EMAIL_KEY, "a@b.com");

        let reopened = FileSessionStore::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));

        reopened.remove_all(&[TOKEN_KEY, EMAIL_KEY]);
        let again = FileSessionStore::open(&path);
        assert!(again.get(TOKEN_KEY).is_none());
        assert!(again.get(EMAIL_KEY).is_none());
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::open(&path);
        assert!(store.get(TOKEN_KEY).is_none());
    }
}
