//! The [`KvStore`] trait and the in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::notify::{ChangeNotifier, ChangeReceiver, KvChange, KvSubscriber, SubscriberId};

/// Maximum key length in bytes.
const MAX_KEY_LEN: usize = 128;

/// Synchronous string key-value store with change notification.
///
/// Writers always replace the whole value for a key; there are no partial
/// or merge writes, so the last writer wins. Writes and their notifications
/// are serialized per store, so observers see changes in write order.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key` and notify observers.
    /// Synchronous subscribers have run by the time this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove `key` and notify observers. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be written.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Register a synchronous change subscriber.
    fn subscribe(&self, subscriber: Arc<dyn KvSubscriber>) -> SubscriberId;

    /// Remove a subscriber. Returns `true` if it was registered.
    fn unsubscribe(&self, id: SubscriberId) -> bool;

    /// Open an async receiver for all future changes.
    fn watch(&self) -> ChangeReceiver;
}

/// Typed JSON helpers for any [`KvStore`].
pub trait KvStoreExt {
    /// Read and deserialize the JSON value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the stored text is not valid
    /// JSON for `T`, or any error from [`KvStore::get`].
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>;

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if `value` cannot be encoded,
    /// or any error from [`KvStore::set`].
    fn store_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()>;
}

impl<S: KvStore + ?Sized> KvStoreExt for S {
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn store_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let text = serde_json::to_string(value)?;
        self.set(key, text)
    }
}

/// Check that `key` is non-empty, short, and made of `[A-Za-z0-9._-]`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] describing the first violation.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".into()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey(format!(
            "key exceeds {MAX_KEY_LEN} bytes"
        )));
    }
    if key.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "key '{key}' must not start with '.'"
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(StorageError::InvalidKey(format!(
            "key '{key}' contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

/// In-memory [`KvStore`] for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    /// Held across a write and its notification.
    write_gate: Mutex<()>,
    notifier: ChangeNotifier,
}

impl MemoryKvStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in an Arc for sharing between views.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |e| e.len())
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_writes(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.write_gate
            .lock()
            .map_err(|e| StorageError::Internal(format!("write lock poisoned: {e}")))
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Internal(format!("failed to read entries: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        validate_key(key)?;
        let _guard = self.lock_writes()?;
        {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| StorageError::Internal(format!("failed to write entries: {e}")))?;
            entries.insert(key.to_owned(), value.clone());
        }
        debug!(key, bytes = value.len(), "memory store set");
        self.notifier.notify(KvChange::set(key, value));
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let _guard = self.lock_writes()?;
        {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| StorageError::Internal(format!("failed to write entries: {e}")))?;
            entries.remove(key);
        }
        debug!(key, "memory store remove");
        self.notifier.notify(KvChange::removed(key));
        Ok(())
    }

    fn subscribe(&self, subscriber: Arc<dyn KvSubscriber>) -> SubscriberId {
        self.notifier.register(subscriber)
    }

    fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.notifier.unregister(id)
    }

    fn watch(&self) -> ChangeReceiver {
        self.notifier.watch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::FnSubscriber;
    use std::sync::Mutex;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryKvStore::new();
        assert!(store.get("fileSystem").unwrap().is_none());

        store.set("fileSystem", "[1]".into()).unwrap();
        assert_eq!(store.get("fileSystem").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.remove("fileSystem").unwrap();
        assert!(store.get("fileSystem").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let store = MemoryKvStore::new();
        assert!(store.remove("nothing-here").is_ok());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let store = MemoryKvStore::new();
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(
            store.set("../escape", "x".into()),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("has space", "x".into()),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(validate_key("aura-terminal-state").is_ok());
    }

    #[test]
    fn test_subscribers_see_set_and_remove() {
        let store = MemoryKvStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        store.subscribe(Arc::new(FnSubscriber::new("recorder", move |c| {
            seen_clone.lock().unwrap().push(c.clone());
        })));

        store.set("recentFiles", "[]".into()).unwrap();
        store.remove("recentFiles").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], KvChange::set("recentFiles", "[]"));
        assert_eq!(seen[1], KvChange::removed("recentFiles"));
    }

    #[test]
    fn test_concurrent_writers_notify_in_write_order() {
        let store = Arc::new(MemoryKvStore::new());
        let last_seen = Arc::new(Mutex::new(None::<String>));
        let last_clone = Arc::clone(&last_seen);
        store.subscribe(Arc::new(FnSubscriber::new("last", move |c| {
            *last_clone.lock().unwrap() = c.new_value.clone();
        })));

        let writers: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.set("fileSystem", format!("{t}-{i}")).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let stored = store.get("fileSystem").unwrap();
        assert_eq!(*last_seen.lock().unwrap(), stored);
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryKvStore::new();
        store.store_json("numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<i32>> = store.load_json("numbers").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        store.set("broken", "{not json".into()).unwrap();
        let err = store.load_json::<Vec<i32>>("broken").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_json_helpers_through_dyn() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        store.store_json("flag", &true).unwrap();
        assert_eq!(store.load_json::<bool>("flag").unwrap(), Some(true));
    }
}
