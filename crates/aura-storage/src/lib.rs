//! Aura Storage: the persistence substrate.
//!
//! Every component of the desktop keeps its state as JSON text under a small
//! set of well-known keys in a synchronous key-value store. The store is
//! shared by every open view, so each write is broadcast as a [`KvChange`]
//! to let the other views refresh their in-memory caches without polling.
//!
//! # Stores
//!
//! | Store | Backing | Use |
//! |-------|---------|-----|
//! | [`MemoryKvStore`] | `HashMap` behind a lock | tests, ephemeral sessions |
//! | [`FileKvStore`] | one `<key>.json` per key in a directory | the `aura` CLI |
//!
//! # Notification
//!
//! Two ways to observe changes, mirroring an event bus:
//!
//! 1. **Synchronous subscribers**: implement [`KvSubscriber`] (or wrap a
//!    closure in [`FnSubscriber`]) and register it with
//!    [`KvStore::subscribe`]. Called inline after every write.
//! 2. **Async watchers**: [`KvStore::watch`] returns a [`ChangeReceiver`]
//!    that can be awaited.
//!
//! # Example
//!
//! ```rust
//! use aura_storage::{KvStore, MemoryKvStore};
//!
//! let store = MemoryKvStore::new();
//! store.set("recentFiles", "[]".to_string()).unwrap();
//! assert_eq!(store.get("recentFiles").unwrap().as_deref(), Some("[]"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod file;
pub mod keys;
pub mod kv;
pub mod notify;

pub use error::{StorageError, StorageResult};
pub use file::FileKvStore;
pub use kv::{KvStore, KvStoreExt, MemoryKvStore, validate_key};
pub use notify::{
    ChangeNotifier, ChangeReceiver, FnSubscriber, KvChange, KvSubscriber, SubscriberId,
};
