//! Configuration types.
//!
//! Self-contained: domain settings types live in the core crates and are
//! converted at the integration boundary. Every struct implements
//! [`Default`] with the same values as `defaults.toml`, so a bare
//! `[section]` header produces a working configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File system defaults.
    pub vfs: VfsSection,
    /// Terminal tunables.
    pub terminal: TerminalSection,
    /// Where state is persisted.
    pub storage: StorageSection,
    /// Log level and format.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// VFS
// ---------------------------------------------------------------------------

/// Default encryption key, a documented and well-known value.
pub const DEFAULT_ENCRYPTION_KEY: &str = "quantum-encryption-key";

/// File system section.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VfsSection {
    /// Key used when encryption is requested without one.
    pub default_encryption_key: String,
    /// Length of the recent-files list.
    pub recent_limit: usize,
}

impl VfsSection {
    /// Whether the default key is still the well-known built-in value.
    #[must_use]
    pub fn uses_builtin_key(&self) -> bool {
        self.default_encryption_key == DEFAULT_ENCRYPTION_KEY
    }
}

impl Default for VfsSection {
    fn default() -> Self {
        Self {
            default_encryption_key: DEFAULT_ENCRYPTION_KEY.to_owned(),
            recent_limit: 10,
        }
    }
}

impl fmt::Debug for VfsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfsSection")
            .field("default_encryption_key", &"[REDACTED]")
            .field("recent_limit", &self.recent_limit)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// Terminal section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSection {
    /// Directory `cd` with no argument goes to. Must be a system path.
    pub home_directory: String,
    /// Command history cap.
    pub history_limit: usize,
    /// Output log cap.
    pub output_limit: usize,
    /// Directories that always exist.
    pub system_paths: Vec<String>,
    /// Launchable application ids.
    pub apps: Vec<String>,
    /// Themed effect timing.
    pub effects: EffectsSection,
}

impl Default for TerminalSection {
    fn default() -> Self {
        Self {
            home_directory: "/home/aura/".to_owned(),
            history_limit: 100,
            output_limit: 500,
            system_paths: [
                "/",
                "/home/",
                "/home/aura/",
                "/home/aura/documents/",
                "/home/aura/projects/",
                "/usr/",
                "/system/",
            ]
            .map(str::to_owned)
            .to_vec(),
            apps: ["notepad", "filemanager", "settings"]
                .map(str::to_owned)
                .to_vec(),
            effects: EffectsSection::default(),
        }
    }
}

/// Themed effect timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsSection {
    /// Delay multiplier; `0` disables delays.
    pub speed: f64,
}

impl Default for EffectsSection {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Persistence backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives the process.
    Memory,
    /// One JSON file per key under `data_dir`.
    #[default]
    File,
}

/// Storage section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Backend kind.
    pub backend: StorageBackend,
    /// Data directory for the file backend. Defaults to `~/.aura/data`.
    pub data_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Base level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Output format: `pretty`, `compact` or `json`.
    pub format: String,
    /// Extra `EnvFilter` directives, such as `aura_vfs=debug`.
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
