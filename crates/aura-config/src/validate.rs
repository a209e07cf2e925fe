//! Post-merge configuration validation.
//!
//! Checks that deserialized [`Config`](crate::Config) values are within
//! range and that cross-field invariants hold.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Largest accepted recent-files list.
const MAX_RECENT_LIMIT: usize = 1000;

/// Largest accepted effect delay multiplier.
const MAX_EFFECT_SPEED: f64 = 100.0;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_vfs(config)?;
    validate_terminal(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_vfs(config: &Config) -> ConfigResult<()> {
    let v = &config.vfs;
    if v.default_encryption_key.is_empty() {
        return Err(invalid(
            "vfs.default_encryption_key",
            "encryption key must not be empty",
        ));
    }
    if v.recent_limit == 0 || v.recent_limit > MAX_RECENT_LIMIT {
        return Err(invalid(
            "vfs.recent_limit",
            format!("recent_limit must be between 1 and {MAX_RECENT_LIMIT}"),
        ));
    }
    Ok(())
}

/// A directory path in canonical form: leading and trailing `/`, no empty,
/// `.` or `..` segments.
fn is_canonical_dir(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    let Some(inner) = path.strip_prefix('/').and_then(|p| p.strip_suffix('/')) else {
        return false;
    };
    inner
        .split('/')
        .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

fn validate_terminal(config: &Config) -> ConfigResult<()> {
    let t = &config.terminal;

    if let Some(bad) = t.system_paths.iter().find(|p| !is_canonical_dir(p)) {
        return Err(invalid(
            "terminal.system_paths",
            format!("'{bad}' is not a canonical directory path (expected '/a/b/')"),
        ));
    }
    if !t.system_paths.iter().any(|p| p == "/") {
        return Err(invalid("terminal.system_paths", "must include the root '/'"));
    }
    if !is_canonical_dir(&t.home_directory) {
        return Err(invalid(
            "terminal.home_directory",
            format!("'{}' is not a canonical directory path", t.home_directory),
        ));
    }
    if !t.system_paths.contains(&t.home_directory) {
        return Err(invalid(
            "terminal.home_directory",
            "home directory must be one of terminal.system_paths",
        ));
    }
    if t.history_limit == 0 {
        return Err(invalid("terminal.history_limit", "must be at least 1"));
    }
    if t.output_limit == 0 {
        return Err(invalid("terminal.output_limit", "must be at least 1"));
    }
    if t.apps.is_empty() || t.apps.iter().any(String::is_empty) {
        return Err(invalid("terminal.apps", "app ids must be non-empty"));
    }
    let speed = t.effects.speed;
    if !speed.is_finite() || !(0.0..=MAX_EFFECT_SPEED).contains(&speed) {
        return Err(invalid(
            "terminal.effects.speed",
            format!("speed {speed} is out of range; must be between 0 and {MAX_EFFECT_SPEED}"),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;
    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }
    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut config = Config::default();
        config.vfs.default_encryption_key.clear();
        assert_eq!(field_of(validate(&config)), "vfs.default_encryption_key");
    }

    #[test]
    fn test_recent_limit_bounds() {
        let mut config = Config::default();
        config.vfs.recent_limit = 1001;
        assert_eq!(field_of(validate(&config)), "vfs.recent_limit");
        config.vfs.recent_limit = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_home_must_be_system_path() {
        let mut config = Config::default();
        config.terminal.home_directory = "/home/other/".into();
        assert_eq!(field_of(validate(&config)), "terminal.home_directory");
        config.terminal.system_paths.push("/home/other/".into());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_system_paths_canonical() {
        let mut config = Config::default();
        config.terminal.system_paths.push("/tmp".into());
        assert_eq!(field_of(validate(&config)), "terminal.system_paths");

        let mut config = Config::default();
        config.terminal.system_paths.push("/a/../b/".into());
        assert_eq!(field_of(validate(&config)), "terminal.system_paths");
    }

    #[test]
    fn test_speed_range() {
        let mut config = Config::default();
        config.terminal.effects.speed = -1.0;
        assert_eq!(field_of(validate(&config)), "terminal.effects.speed");
        config.terminal.effects.speed = f64::INFINITY;
        assert_eq!(field_of(validate(&config)), "terminal.effects.speed");
        config.terminal.effects.speed = 0.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_logging_values() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        assert_eq!(field_of(validate(&config)), "logging.level");

        let mut config = Config::default();
        config.logging.format = "xml".into();
        assert_eq!(field_of(validate(&config)), "logging.format");

        let mut config = Config::default();
        config.logging.level = "DEBUG".into();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_canonical_dir() {
        assert!(is_canonical_dir("/"));
        assert!(is_canonical_dir("/home/aura/"));
        assert!(!is_canonical_dir("home/"));
        assert!(!is_canonical_dir("//"));
        assert!(!is_canonical_dir("/./"));
    }
}
