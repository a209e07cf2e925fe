//! Aura Virtual File System (VFS).
//!
//! Simulates a file system as two JSON collections (files and folders) plus
//! a recent-files list, all kept in an injected [`aura_storage::KvStore`].
//! File content can be compressed and encrypted on write through an
//! [`aura_crypto::TransformPipeline`]; reads undo the transforms in reverse.
//!
//! Several [`VirtualFileSystem`] views may share one store: each subscribes
//! to the store and refreshes its cache when another view writes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use aura_storage::MemoryKvStore;
//! use aura_vfs::{SaveRequest, VfsSettings, VirtualFileSystem};
//!
//! let fs = VirtualFileSystem::new(Arc::new(MemoryKvStore::new()), VfsSettings::default()).unwrap();
//! fs.save_file(SaveRequest::new("todo.md", "- ship it").compress(true)).unwrap();
//!
//! let file = fs.get_file("todo.md", "/").unwrap().unwrap();
//! assert_eq!(file.content, "- ship it");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Virtual filesystem error types.
pub mod error;
/// The file system view.
pub mod fs;
/// Directory path arithmetic.
pub mod path;
/// Persisted record types.
pub mod record;
/// View settings.
pub mod settings;

pub use error::{VfsError, VfsResult};
pub use fs::VirtualFileSystem;
pub use record::{FileRecord, FileType, FolderRecord, RecentEntry, SaveRequest};
pub use settings::{DEFAULT_ENCRYPTION_KEY, DEFAULT_RECENT_LIMIT, VfsSettings};
