//! The [`VirtualFileSystem`]: record CRUD over a shared key-value store.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

use aura_crypto::{ContentKey, TransformPipeline};
use aura_storage::{
    FnSubscriber, KvChange, KvStore, KvStoreExt, StorageError, SubscriberId, keys,
};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::path::{self, ROOT, normalize_dir};
use crate::record::{
    FileRecord, FileType, FolderRecord, RecentEntry, SaveRequest, StoredRecent, normalize_tags,
};
use crate::settings::VfsSettings;
use crate::{VfsError, VfsResult};

/// Cached mirror of the three persisted collections.
#[derive(Debug, Default)]
struct Collections {
    files: Vec<FileRecord>,
    folders: Vec<FolderRecord>,
    recent: Vec<RecentEntry>,
}

/// A view over the file and folder collections in a [`KvStore`].
///
/// Several views may share one store. Every mutation persists the whole
/// affected collection, and each view subscribes to the store so it picks
/// up writes made through the others. The current path is per view and is
/// not persisted.
pub struct VirtualFileSystem {
    store: Arc<dyn KvStore>,
    settings: VfsSettings,
    cache: Arc<RwLock<Collections>>,
    current_path: RwLock<String>,
    /// Serializes read-modify-persist sequences made through this view.
    write_lock: Mutex<()>,
    subscription: SubscriberId,
}

impl VirtualFileSystem {
    /// Load the collections from `store` and start following its changes.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Storage`] if the store cannot be read, or
    /// [`VfsError::Serialization`] if the file or folder collection is
    /// corrupt. An unreadable recent-files list is logged and dropped.
    pub fn new(store: Arc<dyn KvStore>, settings: VfsSettings) -> VfsResult<Self> {
        let cache = Arc::new(RwLock::new(load_collections(store.as_ref())?));

        let weak: Weak<RwLock<Collections>> = Arc::downgrade(&cache);
        let subscription = store.subscribe(Arc::new(FnSubscriber::new(
            "vfs-cache",
            move |change: &KvChange| {
                if let Some(cache) = weak.upgrade() {
                    apply_change(&cache, change);
                }
            },
        )));

        {
            let cache = cache_read(&cache);
            info!(
                files = cache.files.len(),
                folders = cache.folders.len(),
                %subscription,
                "virtual file system loaded"
            );
        }

        Ok(Self {
            store,
            settings,
            cache,
            current_path: RwLock::new(ROOT.to_owned()),
            write_lock: Mutex::new(()),
            subscription,
        })
    }

    /// The settings this view was created with.
    #[must_use]
    pub fn settings(&self) -> &VfsSettings {
        &self.settings
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Create or overwrite the file `(name, path)`.
    ///
    /// Content is compressed, then encrypted, as requested. Overwriting keeps
    /// the record's id, tags and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Validation`] for an empty name or content,
    /// [`VfsError::Transform`] if a transform fails, or [`VfsError::Storage`].
    pub fn save_file(&self, request: SaveRequest) -> VfsResult<FileRecord> {
        let name = validate_file_name(&request.name)?;
        if request.content.is_empty() {
            return Err(VfsError::Validation("content is required".into()));
        }
        let dir = normalize_dir(&request.path);

        let key = if request.encrypt {
            Some(self.resolve_key(request.encryption_key.as_deref(), &name)?)
        } else {
            None
        };
        let pipeline = TransformPipeline::from_flags(request.compress, request.encrypt);
        let stored = pipeline.apply(&request.content, key.as_ref())?;

        let _guard = self.lock_writes()?;
        let now = Utc::now();
        let (mut files, mut recent) = {
            let cache = cache_read(&self.cache);
            (cache.files.clone(), cache.recent.clone())
        };

        let record = match files.iter_mut().find(|f| f.is_at(&name, &dir)) {
            Some(existing) => {
                existing.content = stored;
                existing.original_content = request.content;
                existing.file_type = request.file_type;
                existing.size = byte_len(&existing.original_content);
                existing.is_encrypted = request.encrypt;
                existing.is_compressed = request.compress;
                existing.updated_at = now;
                existing.last_opened = now;
                existing.clone()
            },
            None => {
                let record = FileRecord {
                    id: new_id(),
                    name: name.clone(),
                    path: dir.clone(),
                    size: byte_len(&request.content),
                    content: stored,
                    original_content: request.content,
                    file_type: request.file_type,
                    tags: Vec::new(),
                    is_encrypted: request.encrypt,
                    is_compressed: request.compress,
                    created_at: now,
                    updated_at: now,
                    last_opened: now,
                };
                files.push(record.clone());
                record
            },
        };
        push_recent(&mut recent, RecentEntry::new(&name, &dir), self.settings.recent_limit);

        self.persist_files(&files)?;
        self.persist_recent(&recent)?;
        debug!(
            name = %record.name,
            path = %record.path,
            size = record.size,
            pipeline = ?pipeline.steps(),
            "saved file"
        );
        Ok(record)
    }

    /// Read `(name, path)` with the configured default key.
    ///
    /// The returned record's `content` is the plaintext. Reading bumps
    /// `last_opened` and the recent-files list.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Transform`] if the content cannot be decoded, or
    /// [`VfsError::Storage`]. A missing file is `Ok(None)`.
    pub fn get_file(&self, name: &str, path: &str) -> VfsResult<Option<FileRecord>> {
        self.read_file(name, path, None)
    }

    /// Read `(name, path)`, decrypting with `key`.
    ///
    /// # Errors
    ///
    /// As [`get_file`](Self::get_file); a wrong key is [`VfsError::Transform`].
    pub fn get_file_with_key(
        &self,
        name: &str,
        path: &str,
        key: &str,
    ) -> VfsResult<Option<FileRecord>> {
        self.read_file(name, path, Some(key))
    }

    fn read_file(
        &self,
        name: &str,
        path: &str,
        key: Option<&str>,
    ) -> VfsResult<Option<FileRecord>> {
        let dir = normalize_dir(path);
        let _guard = self.lock_writes()?;
        let (mut files, mut recent) = {
            let cache = cache_read(&self.cache);
            (cache.files.clone(), cache.recent.clone())
        };
        let Some(record) = files.iter_mut().find(|f| f.is_at(name, &dir)) else {
            debug!(name, path = %dir, "file not found");
            return Ok(None);
        };

        let pipeline = record.pipeline();
        let key = if pipeline.needs_key() {
            Some(match key {
                Some(k) => ContentKey::new(k)?,
                None => ContentKey::new(self.settings.default_encryption_key.as_str())?,
            })
        } else {
            None
        };
        let plaintext = pipeline.reverse(&record.content, key.as_ref())?;

        record.last_opened = Utc::now();
        let mut opened = record.clone();
        opened.content = plaintext;

        push_recent(&mut recent, RecentEntry::new(name, &dir), self.settings.recent_limit);
        self.persist_files(&files)?;
        self.persist_recent(&recent)?;
        Ok(Some(opened))
    }

    /// Create an empty file, or refresh the timestamps of an existing one.
    ///
    /// Returns the record and `true` if it was newly created.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Validation`] for an invalid name, or
    /// [`VfsError::Storage`].
    pub fn touch_file(&self, name: &str, path: &str) -> VfsResult<(FileRecord, bool)> {
        let name = validate_file_name(name)?;
        let dir = normalize_dir(path);

        let _guard = self.lock_writes()?;
        let now = Utc::now();
        let mut files = cache_read(&self.cache).files.clone();
        let (record, created) = match files.iter_mut().find(|f| f.is_at(&name, &dir)) {
            Some(existing) => {
                existing.updated_at = now;
                (existing.clone(), false)
            },
            None => {
                let record = FileRecord {
                    id: new_id(),
                    file_type: FileType::from_file_name(&name),
                    name,
                    path: dir,
                    content: String::new(),
                    original_content: String::new(),
                    size: 0,
                    tags: Vec::new(),
                    is_encrypted: false,
                    is_compressed: false,
                    created_at: now,
                    updated_at: now,
                    last_opened: now,
                };
                files.push(record.clone());
                (record, true)
            },
        };
        self.persist_files(&files)?;
        debug!(name = %record.name, path = %record.path, created, "touched file");
        Ok((record, created))
    }

    /// Delete `(name, path)` and drop it from the recent-files list.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] if the file does not exist, or
    /// [`VfsError::Storage`].
    pub fn delete_file(&self, name: &str, path: &str) -> VfsResult<()> {
        let dir = normalize_dir(path);
        let _guard = self.lock_writes()?;
        let (mut files, mut recent) = {
            let cache = cache_read(&self.cache);
            (cache.files.clone(), cache.recent.clone())
        };
        let before = files.len();
        files.retain(|f| !f.is_at(name, &dir));
        if files.len() == before {
            return Err(VfsError::NotFound(format!("file '{name}' in {dir}")));
        }
        recent.retain(|r| !(r.name == name && r.path == dir));

        self.persist_files(&files)?;
        self.persist_recent(&recent)?;
        debug!(name, path = %dir, "deleted file");
        Ok(())
    }

    /// Replace the tags of `(name, path)`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] if the file does not exist, or
    /// [`VfsError::Storage`].
    pub fn update_file_tags<I, S>(&self, name: &str, path: &str, tags: I) -> VfsResult<FileRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dir = normalize_dir(path);
        let tags = normalize_tags(tags);
        let _guard = self.lock_writes()?;
        let mut files = cache_read(&self.cache).files.clone();
        let record = files
            .iter_mut()
            .find(|f| f.is_at(name, &dir))
            .ok_or_else(|| VfsError::NotFound(format!("file '{name}' in {dir}")))?;
        record.tags = tags;
        record.updated_at = Utc::now();
        let updated = record.clone();

        self.persist_files(&files)?;
        debug!(name, path = %dir, tags = ?updated.tags, "updated file tags");
        Ok(updated)
    }

    /// Every file, in insertion order.
    #[must_use]
    pub fn files(&self) -> Vec<FileRecord> {
        cache_read(&self.cache).files.clone()
    }

    /// Files directly inside `path`, in insertion order.
    #[must_use]
    pub fn files_in_path(&self, path: &str) -> Vec<FileRecord> {
        let dir = normalize_dir(path);
        cache_read(&self.cache)
            .files
            .iter()
            .filter(|f| f.path == dir)
            .cloned()
            .collect()
    }

    /// Files of `file_type`, optionally limited to one directory.
    #[must_use]
    pub fn files_by_type(&self, file_type: FileType, path: Option<&str>) -> Vec<FileRecord> {
        let dir = path.map(normalize_dir);
        cache_read(&self.cache)
            .files
            .iter()
            .filter(|f| f.file_type == file_type)
            .filter(|f| dir.as_ref().is_none_or(|d| &f.path == d))
            .cloned()
            .collect()
    }

    /// Files whose name, plaintext or tags contain `query`, ignoring case.
    ///
    /// With `path`, only files directly in that directory are considered.
    /// An empty query matches everything in scope.
    #[must_use]
    pub fn search_files(&self, query: &str, path: Option<&str>) -> Vec<FileRecord> {
        let needle = query.trim().to_lowercase();
        let dir = path.map(normalize_dir);
        cache_read(&self.cache)
            .files
            .iter()
            .filter(|f| dir.as_ref().is_none_or(|d| &f.path == d))
            .filter(|f| needle.is_empty() || f.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    // ---------------------------------------------------------------------
    // Folders
    // ---------------------------------------------------------------------

    /// Create folder `name` inside `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Validation`] for an empty or nested name,
    /// [`VfsError::Conflict`] if the folder already exists, or
    /// [`VfsError::Storage`].
    pub fn create_folder(&self, name: &str, parent: &str) -> VfsResult<FolderRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VfsError::Validation("folder name is required".into()));
        }
        if name.contains('/') || name == "." || name == ".." {
            return Err(VfsError::Validation(format!(
                "invalid folder name '{name}'"
            )));
        }
        let parent_path = normalize_dir(parent);
        let folder_path = path::join_dir(&parent_path, name);

        let _guard = self.lock_writes()?;
        let mut folders = cache_read(&self.cache).folders.clone();
        if folders.iter().any(|f| f.path == folder_path) {
            return Err(VfsError::Conflict(format!(
                "folder '{name}' already exists in {parent_path}"
            )));
        }

        let now = Utc::now();
        let folder = FolderRecord {
            id: new_id(),
            name: name.to_owned(),
            path: folder_path,
            parent_path,
            created_at: now,
            updated_at: now,
        };
        folders.push(folder.clone());
        self.persist_folders(&folders)?;
        debug!(name, path = %folder.path, "created folder");
        Ok(folder)
    }

    /// Delete the folder at `path`, every folder beneath it, and every file
    /// whose directory starts with it.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Validation`] for the root, [`VfsError::NotFound`]
    /// if no folder record exists at `path`, or [`VfsError::Storage`].
    pub fn delete_folder(&self, path: &str) -> VfsResult<()> {
        let dir = normalize_dir(path);
        if dir == ROOT {
            return Err(VfsError::Validation(
                "the root directory cannot be deleted".into(),
            ));
        }

        let _guard = self.lock_writes()?;
        let (mut files, mut folders, mut recent) = {
            let cache = cache_read(&self.cache);
            (cache.files.clone(), cache.folders.clone(), cache.recent.clone())
        };
        if !folders.iter().any(|f| f.path == dir) {
            return Err(VfsError::NotFound(format!("folder {dir}")));
        }

        let folders_before = folders.len();
        let files_before = files.len();
        folders.retain(|f| !path::is_within(&f.path, &dir));
        files.retain(|f| !path::is_within(&f.path, &dir));
        recent.retain(|r| !path::is_within(&r.path, &dir));

        self.persist_folders(&folders)?;
        self.persist_files(&files)?;
        self.persist_recent(&recent)?;
        info!(
            path = %dir,
            folders_removed = folders_before.saturating_sub(folders.len()),
            files_removed = files_before.saturating_sub(files.len()),
            "deleted folder"
        );
        Ok(())
    }

    /// Every folder, in insertion order.
    #[must_use]
    pub fn folders(&self) -> Vec<FolderRecord> {
        cache_read(&self.cache).folders.clone()
    }

    /// Folders whose parent is `path`.
    #[must_use]
    pub fn folders_in_path(&self, path: &str) -> Vec<FolderRecord> {
        let dir = normalize_dir(path);
        cache_read(&self.cache)
            .folders
            .iter()
            .filter(|f| f.parent_path == dir)
            .cloned()
            .collect()
    }

    /// Whether a folder record exists at `path`. The root always exists.
    #[must_use]
    pub fn folder_exists(&self, path: &str) -> bool {
        let dir = normalize_dir(path);
        dir == ROOT || cache_read(&self.cache).folders.iter().any(|f| f.path == dir)
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// The current directory of this view.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.current_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the current directory. No existence check is made.
    pub fn navigate_to_path(&self, path: &str) {
        let dir = normalize_dir(path);
        debug!(path = %dir, "navigate");
        *self
            .current_path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = dir;
    }

    /// Move to the parent directory. At the root this does nothing and
    /// returns `false`.
    pub fn navigate_up(&self) -> bool {
        let mut current = self
            .current_path
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match path::parent_dir(&current) {
            Some(parent) => {
                *current = parent;
                true
            },
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Recents
    // ---------------------------------------------------------------------

    /// The recent-files list, most recent first.
    #[must_use]
    pub fn recent_entries(&self) -> Vec<RecentEntry> {
        cache_read(&self.cache).recent.clone()
    }

    /// Recent files resolved to records, most recent first.
    ///
    /// `content` carries the plaintext. Entries whose file no longer exists
    /// are skipped.
    #[must_use]
    pub fn recent_files(&self) -> Vec<FileRecord> {
        let cache = cache_read(&self.cache);
        cache
            .recent
            .iter()
            .filter_map(|entry| {
                cache
                    .files
                    .iter()
                    .find(|f| f.is_at(&entry.name, &entry.path))
                    .map(|f| FileRecord {
                        content: f.original_content.clone(),
                        ..f.clone()
                    })
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Maintenance
    // ---------------------------------------------------------------------

    /// Remove every file, folder and recent entry.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Storage`] if a key cannot be removed.
    pub fn clear_all_files(&self) -> VfsResult<()> {
        let _guard = self.lock_writes()?;
        self.store.remove(keys::FILES)?;
        self.store.remove(keys::FOLDERS)?;
        self.store.remove(keys::RECENT_FILES)?;
        info!("cleared all files and folders");
        Ok(())
    }

    /// Re-read every collection from the store.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn reload(&self) -> VfsResult<()> {
        let fresh = load_collections(self.store.as_ref())?;
        *cache_write(&self.cache) = fresh;
        debug!("reloaded collections from store");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn resolve_key(&self, supplied: Option<&str>, name: &str) -> VfsResult<ContentKey> {
        match supplied {
            Some(key) => Ok(ContentKey::new(key)?),
            None => {
                warn!(
                    name,
                    "no encryption key supplied; using the configured default key"
                );
                Ok(ContentKey::new(self.settings.default_encryption_key.as_str())?)
            },
        }
    }

    fn lock_writes(&self) -> VfsResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| VfsError::Internal(format!("write lock poisoned: {e}")))
    }

    fn persist_files(&self, files: &[FileRecord]) -> VfsResult<()> {
        self.persist(keys::FILES, files)
    }

    fn persist_folders(&self, folders: &[FolderRecord]) -> VfsResult<()> {
        self.persist(keys::FOLDERS, folders)
    }

    fn persist_recent(&self, recent: &[RecentEntry]) -> VfsResult<()> {
        self.persist(keys::RECENT_FILES, recent)
    }

    /// Write a whole collection.
    ///
    /// The cache is not touched here. The store calls our own subscriber
    /// under its write lock, so every view applies changes in store order.
    /// No cache lock may be held by the caller.
    fn persist<T: Serialize>(&self, key: &str, value: &[T]) -> VfsResult<()> {
        self.store.store_json(key, value)?;
        Ok(())
    }
}

impl Drop for VirtualFileSystem {
    fn drop(&mut self) {
        if !self.store.unsubscribe(self.subscription) {
            debug!(subscription = %self.subscription, "vfs subscription already removed");
        }
    }
}

impl std::fmt::Debug for VirtualFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = cache_read(&self.cache);
        f.debug_struct("VirtualFileSystem")
            .field("files", &cache.files.len())
            .field("folders", &cache.folders.len())
            .field("recent", &cache.recent.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn cache_read(cache: &RwLock<Collections>) -> RwLockReadGuard<'_, Collections> {
    cache.read().unwrap_or_else(PoisonError::into_inner)
}

fn cache_write(cache: &RwLock<Collections>) -> RwLockWriteGuard<'_, Collections> {
    cache.write().unwrap_or_else(PoisonError::into_inner)
}

fn load_collections(store: &dyn KvStore) -> VfsResult<Collections> {
    let files: Vec<FileRecord> = load_list(store, keys::FILES)?;
    let folders = load_list(store, keys::FOLDERS)?;
    let recent = load_recent(store, &files)?;
    Ok(Collections {
        files,
        folders,
        recent,
    })
}

/// Bare file names resolve to the first file with that name. An unreadable
/// list is dropped rather than failing the load.
fn load_recent(store: &dyn KvStore, files: &[FileRecord]) -> VfsResult<Vec<RecentEntry>> {
    let stored = match store.load_json::<Vec<StoredRecent>>(keys::RECENT_FILES) {
        Ok(list) => list.unwrap_or_default(),
        Err(StorageError::Serialization(msg)) => {
            warn!(key = keys::RECENT_FILES, error = %msg, "discarding unreadable recent files");
            return Ok(Vec::new());
        },
        Err(e) => return Err(e.into()),
    };
    Ok(stored
        .into_iter()
        .filter_map(|item| match item {
            StoredRecent::Entry(entry) => Some(entry),
            StoredRecent::Name(name) => files
                .iter()
                .find(|f| f.name == name)
                .map(|f| RecentEntry::new(&f.name, &f.path)),
        })
        .collect())
}

fn load_list<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> VfsResult<Vec<T>> {
    match store.load_json::<Vec<T>>(key) {
        Ok(list) => Ok(list.unwrap_or_default()),
        Err(StorageError::Serialization(msg)) => {
            Err(VfsError::Serialization(format!("{key}: {msg}")))
        },
        Err(e) => Err(e.into()),
    }
}

/// Replace one cached collection from a store notification.
fn apply_change(cache: &RwLock<Collections>, change: &KvChange) {
    match change.key.as_str() {
        keys::FILES => {
            if let Some(files) = decode_change(change) {
                cache_write(cache).files = files;
            }
        },
        keys::FOLDERS => {
            if let Some(folders) = decode_change(change) {
                cache_write(cache).folders = folders;
            }
        },
        keys::RECENT_FILES => {
            if let Some(recent) = decode_change(change) {
                cache_write(cache).recent = recent;
            }
        },
        _ => {},
    }
}

fn decode_change<T: DeserializeOwned>(change: &KvChange) -> Option<Vec<T>> {
    match change.new_value.as_deref() {
        None => Some(Vec::new()),
        Some(text) => match serde_json::from_str(text) {
            Ok(list) => Some(list),
            Err(e) => {
                warn!(key = %change.key, error = %e, "ignoring undecodable store change");
                None
            },
        },
    }
}

fn validate_file_name(name: &str) -> VfsResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VfsError::Validation("file name is required".into()));
    }
    if name.contains('/') {
        return Err(VfsError::Validation(format!(
            "file name '{name}' must not contain '/'"
        )));
    }
    Ok(name.to_owned())
}

fn push_recent(recent: &mut Vec<RecentEntry>, entry: RecentEntry, limit: usize) {
    recent.retain(|r| r != &entry);
    recent.insert(0, entry);
    recent.truncate(limit);
}

fn byte_len(text: &str) -> u64 {
    u64::try_from(text.len()).unwrap_or(u64::MAX)
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}
