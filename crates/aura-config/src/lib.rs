#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Layered configuration for Aura.
//!
//! # Usage
//!
//! ```rust,no_run
//! use aura_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("history limit: {}", resolved.config.terminal.history_limit);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** (`aura --config FILE`)
//! 2. **User** (`~/.aura/config.toml`, or `$AURA_HOME/config.toml`)
//! 3. **Environment variables** (`AURA_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal aura crates**.
//! Conversion to the VFS and terminal settings types happens in the CLI.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging.
pub mod merge;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, None)
    }

    /// Load configuration with an alternate `~/.aura` directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        aura_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, Some(aura_home))
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
