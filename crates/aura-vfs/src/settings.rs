use std::fmt;

/// Weak fallback passphrase used when a caller supplies no key.
///
/// Anyone who can read the store can decrypt content sealed with it. Deploys
/// should override it through configuration.
pub const DEFAULT_ENCRYPTION_KEY: &str = "quantum-encryption-key";

/// Default length of the recent-files list.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Tunables for a [`VirtualFileSystem`](crate::VirtualFileSystem).
#[derive(Clone)]
pub struct VfsSettings {
    /// Passphrase for saves and reads that do not supply one.
    pub default_encryption_key: String,
    /// Maximum number of recent-file entries kept.
    pub recent_limit: usize,
}

impl Default for VfsSettings {
    fn default() -> Self {
        Self {
            default_encryption_key: DEFAULT_ENCRYPTION_KEY.to_owned(),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl fmt::Debug for VfsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfsSettings")
            .field("default_encryption_key", &"[REDACTED]")
            .field("recent_limit", &self.recent_limit)
            .finish()
    }
}
