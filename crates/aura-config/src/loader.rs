//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge the user file (`~/.aura/config.toml`, else `$AURA_HOME/config.toml`)
//! 3. Merge the explicit file passed on the command line
//! 4. Apply `AURA_*` env var fallbacks for fields still at their default
//! 5. Deserialize merged tree → `Config`
//! 6. Validate
//! 7. Return `ResolvedConfig`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::deep_merge;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Name of the per-user directory under `$HOME`.
const AURA_DIR: &str = ".aura";

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: Config,
    /// Files that contributed, lowest precedence first.
    pub loaded_files: Vec<String>,
    /// Environment variables that filled a field.
    pub env_applied: Vec<String>,
    /// The per-user Aura directory (`~/.aura` unless overridden).
    pub aura_home: PathBuf,
}

impl ResolvedConfig {
    /// Directory for the file storage backend.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(|| self.aura_home.join("data"))
    }
}

/// Load configuration from the real process environment.
///
/// `explicit` is an extra file merged above the user file. `aura_home_override`
/// replaces the `~/.aura` directory (and disables the `AURA_HOME` lookup).
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, or if the
/// final merged configuration fails validation.
pub fn load(explicit: Option<&Path>, aura_home_override: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    load_with_env(explicit, aura_home_override, &collect_env_vars())
}

/// Load configuration with an explicit set of `AURA_*` variables.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, or if the
/// final merged configuration fails validation.
pub fn load_with_env(
    explicit: Option<&Path>,
    aura_home_override: Option<&Path>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Parse embedded defaults.
    let defaults: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut merged = defaults.clone();
    let mut loaded_files = Vec::new();

    // 2. User config.
    let aura_home = match aura_home_override {
        Some(dir) => dir.to_path_buf(),
        None => home_directory()?.join(AURA_DIR),
    };
    let mut user_path = aura_home.join("config.toml");
    let mut user_overlay = try_load_file(&user_path)?;
    if user_overlay.is_none()
        && aura_home_override.is_none()
        && let Some(alt_home) = env_vars.get("AURA_HOME").filter(|h| !h.is_empty())
    {
        user_path = PathBuf::from(alt_home).join("config.toml");
        user_overlay = try_load_file(&user_path)?;
    }
    if let Some(overlay) = user_overlay {
        deep_merge(&mut merged, &overlay);
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    // 3. Explicit config. Unlike the user file, it must exist.
    if let Some(path) = explicit {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        deep_merge(&mut merged, &overlay);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded config file");
    }

    // 4. Env fallbacks.
    let env_applied = apply_env_fallbacks(&mut merged, &defaults, env_vars)?;
    if !env_applied.is_empty() {
        debug!(vars = ?env_applied, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        loaded_files,
        env_applied,
        aura_home,
    })
}

/// Load a config from a specific file path (no layering).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;
    let config: Config = overlay
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Uses a single read operation, so there is no window between an existence
/// check and the read.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len(),
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}
