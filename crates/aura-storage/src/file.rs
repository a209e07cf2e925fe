//! Directory-backed store: one `<key>.json` file per key.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::kv::{KvStore, validate_key};
use crate::notify::{ChangeNotifier, ChangeReceiver, KvChange, KvSubscriber, SubscriberId};

/// File extension for stored values.
const VALUE_EXTENSION: &str = "json";

/// [`KvStore`] persisting each key as a file in a data directory.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a crash never leaves a half-written value behind.
#[derive(Debug)]
pub struct FileKvStore {
    root: PathBuf,
    write_lock: Mutex<()>,
    notifier: ChangeNotifier,
}

impl FileKvStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        info!(path = %root.display(), "opened file store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Wrap in an Arc for sharing between views.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The directory this store writes to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    fn lock_writes(&self) -> StorageResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StorageError::Internal(format!("write lock poisoned: {e}")))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.value_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let path = self.value_path(key)?;
        {
            let _guard = self.lock_writes()?;
            let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
            tmp.write_all(value.as_bytes())?;
            tmp.flush()?;
            tmp.persist(&path).map_err(|e| StorageError::Io(e.error))?;
            debug!(key, bytes = value.len(), "file store set");
            self.notifier.notify(KvChange::set(key, value));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.value_path(key)?;
        {
            let _guard = self.lock_writes()?;
            match std::fs::remove_file(&path) {
                Ok(()) => {},
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => return Err(StorageError::Io(e)),
            }
            debug!(key, "file store remove");
            self.notifier.notify(KvChange::removed(key));
        }
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
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();

        store.set("folderSystem", "[]".into()).unwrap();
        assert!(dir.path().join("folderSystem.json").exists());
        assert_eq!(store.get("folderSystem").unwrap().as_deref(), Some("[]"));

        store.remove("folderSystem").unwrap();
        assert!(!dir.path().join("folderSystem.json").exists());
        assert!(store.get("folderSystem").unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileKvStore::open(dir.path()).unwrap();
            store.set("recentFiles", r#"[{"name":"a.txt","path":"/"}]"#.into()).unwrap();
        }
        let reopened = FileKvStore::open(dir.path()).unwrap();
        let value = reopened.get("recentFiles").unwrap().unwrap();
        assert!(value.contains("a.txt"));
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileKvStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.root(), nested.as_path());
    }

    #[test]
    fn test_traversal_key_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../outside", "x".into()),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_watchers_notified() {
        let dir = TempDir::new().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();
        let mut rx = store.watch();

        store.set("fileSystem", "[]".into()).unwrap();
        let change = rx.recv().await.unwrap();
        assert_eq!(change.key, "fileSystem");
    }
}
