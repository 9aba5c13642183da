//! Session token store.
//!
//! The token is opaque to the client. Its presence is the only signal that
//! the user is authenticated; there is no separate flag. The store persists
//! the token through a [`SessionStorage`] backend and broadcasts every
//! change on a `watch` channel.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::error::Result;

/// Fixed key the token is persisted under.
pub const SESSION_KEY: &str = "session_token";

/// Current authentication session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Durable backing for the session token.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// Token persisted as `{"session_token": "..."}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_doc(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_doc(&self, doc: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(doc)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            file.write_all(contents.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)?;
            file.write_all(contents.as_bytes())?;
        }

        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read_doc()?.remove(SESSION_KEY))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut doc = self.read_doc()?;
        doc.insert(SESSION_KEY.to_string(), token.to_string());
        self.write_doc(&doc)
    }

    fn remove(&self) -> Result<()> {
        let mut doc = self.read_doc()?;
        if doc.remove(SESSION_KEY).is_some() {
            self.write_doc(&doc)?;
        }
        Ok(())
    }
}

/// In-memory slot. Clones share the slot, so a store rebuilt over a clone
/// sees what the previous store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Holds the current [`Session`] and notifies subscribers on change.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    tx: watch::Sender<Session>,
}

impl SessionStore {
    /// Create a store initialised from whatever `storage` holds.
    ///
    /// An unreadable backing store starts the session logged out rather than
    /// failing startup.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted session");
                None
            }
        };
        tracing::debug!(authenticated = token.is_some(), "session store initialised");
        let (tx, _) = watch::channel(Session { token });
        Self {
            storage: Box::new(storage),
            tx,
        }
    }

    /// Store backed by a JSON file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSessionStorage::new(path))
    }

    /// Store backed by a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStorage::new())
    }

    pub fn get(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    /// Persist `token` and notify subscribers.
    pub fn set(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.storage.save(&token)?;
        self.tx.send_replace(Session::with_token(token));
        tracing::info!("session established");
        Ok(())
    }

    /// Remove the persisted token and notify subscribers.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove()?;
        self.tx.send_replace(Session::default());
        tracing::info!("session cleared");
        Ok(())
    }

    /// Receiver that observes the current session and every later change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.tx.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());
        store.set("tok").unwrap();
        assert_eq!(store.get(), Session::with_token("tok"));
    }

    #[test]
    fn test_set_survives_reload() {
        let storage = MemorySessionStorage::new();
        let store = SessionStore::new(storage.clone());
        store.set("tok123").unwrap();
        drop(store);

        let reloaded = SessionStore::new(storage);
        assert_eq!(reloaded.get().token.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_clear_survives_reload() {
        let storage = MemorySessionStorage::new();
        let store = SessionStore::new(storage.clone());
        store.set("tok123").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(), Session::default());

        let reloaded = SessionStore::new(storage);
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::open(&path);
        store.set("file-token").unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(SESSION_KEY));

        let reloaded = SessionStore::open(&path);
        assert_eq!(reloaded.get().token.as_deref(), Some("file-token"));

        reloaded.clear().unwrap();
        assert!(!SessionStore::open(&path).is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStorage::new(&path).save("t").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(!SessionStore::open(&path).is_authenticated());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();
        assert!(!rx.borrow_and_update().is_authenticated());

        store.set("a").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().token.as_deref(), Some("a"));

        store.clear().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", Session::with_token("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }
}
