use aura_crypto::CryptoError;
use aura_storage::StorageError;
use thiserror::Error;

/// Virtual file system errors.
#[derive(Debug, Error)]
pub enum VfsError {
    /// A required field was missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced file or folder does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record would collide with an existing one.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Content could not be transformed (wrong key, corrupt payload).
    #[error("Transform error: {0}")]
    Transform(#[from] CryptoError),

    /// The persistence substrate failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A persisted collection could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal invariant broken.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience result type for VFS operations.
pub type VfsResult<T> = Result<T, VfsError>;
