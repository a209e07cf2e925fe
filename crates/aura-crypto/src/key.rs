//! Passphrase-based content keys.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};

/// Domain separation context for the stream cipher subkey.
const ENCRYPTION_CONTEXT: &str = "aura-desk 2025-06 content encryption";
/// Domain separation context for the authentication subkey.
const AUTHENTICATION_CONTEXT: &str = "aura-desk 2025-06 content authentication";

/// A user-supplied passphrase used to encrypt file content.
///
/// The passphrase is zeroized on drop and never printed. Subkeys come from
/// one `blake3::derive_key` call per purpose. That is not a password KDF:
/// there is no work factor, so treat the result as obfuscation only.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    passphrase: String,
}

impl ContentKey {
    /// Wrap a passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EmptyKey`] if the passphrase is empty.
    pub fn new(passphrase: impl Into<String>) -> CryptoResult<Self> {
        let passphrase = passphrase.into();
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyKey);
        }
        Ok(Self { passphrase })
    }

    /// Short, non-reversible identifier for logs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(self.passphrase.as_bytes());
        hex::encode(&hash.as_bytes()[..4])
    }

    /// Derive the per-message subkeys for `salt`. No key stretching.
    pub(crate) fn derive(&self, salt: &[u8]) -> SubKeys {
        let mut material = Zeroizing::new(Vec::with_capacity(
            self.passphrase.len().saturating_add(salt.len()),
        ));
        material.extend_from_slice(self.passphrase.as_bytes());
        material.extend_from_slice(salt);

        SubKeys {
            encryption: blake3::derive_key(ENCRYPTION_CONTEXT, &material),
            authentication: blake3::derive_key(AUTHENTICATION_CONTEXT, &material),
        }
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Subkeys derived from a [`ContentKey`] and a salt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct SubKeys {
    pub(crate) encryption: [u8; 32],
    pub(crate) authentication: [u8; 32],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(ContentKey::new(""), Err(CryptoError::EmptyKey)));
    }

    #[test]
    fn test_debug_hides_passphrase() {
        let key = ContentKey::new("hunter2").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(&key.fingerprint()));
    }

    #[test]
    fn test_derivation_depends_on_salt() {
        let key = ContentKey::new("quantum-encryption-key").unwrap();
        let a = key.derive(&[1u8; 16]);
        let b = key.derive(&[2u8; 16]);
        assert_ne!(a.encryption, b.encryption);
        assert_ne!(a.encryption, a.authentication);
    }
}
