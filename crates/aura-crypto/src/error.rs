//! Content transform error types.

use thiserror::Error;

/// Errors that can occur while transforming stored content.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// An encryption key was empty.
    #[error("encryption key must not be empty")]
    EmptyKey,

    /// An encrypt step ran without a key.
    #[error("no encryption key supplied for encrypted content")]
    MissingKey,

    /// Invalid base64 encoding.
    #[error("invalid base64 encoding")]
    InvalidBase64Encoding,

    /// The payload does not have the expected envelope.
    #[error("invalid ciphertext: {0}")]
    InvalidFormat(String),

    /// The authentication tag did not match (wrong key or tampered data).
    #[error("decryption failed: wrong key or corrupted content")]
    AuthenticationFailed,

    /// Deflate stream could not be produced or read.
    #[error("compression error: {0}")]
    Compression(String),

    /// The recovered bytes are not valid UTF-8.
    #[error("content is not valid UTF-8")]
    InvalidUtf8,
}

impl From<base64::DecodeError> for CryptoError {
    fn from(_: base64::DecodeError) -> Self {
        Self::InvalidBase64Encoding
    }
}

/// Result type for content transforms.
pub type CryptoResult<T> = Result<T, CryptoError>;
