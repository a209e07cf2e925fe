//! Environment variable fallbacks.
//!
//! An `AURA_*` variable only fills a field that no config file has changed
//! from its embedded default. Files always win over the environment.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{get_nested, set_nested};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AURA_";

/// How an environment value becomes a TOML value.
#[derive(Debug, Clone, Copy)]
enum EnvKind {
    Str,
    Float,
}

/// Variable name, target field, value kind.
const FALLBACKS: &[(&str, &[&str], EnvKind)] = &[
    ("AURA_LOG_LEVEL", &["logging", "level"], EnvKind::Str),
    (
        "AURA_ENCRYPTION_KEY",
        &["vfs", "default_encryption_key"],
        EnvKind::Str,
    ),
    ("AURA_DATA_DIR", &["storage", "data_dir"], EnvKind::Str),
    (
        "AURA_EFFECT_SPEED",
        &["terminal", "effects", "speed"],
        EnvKind::Float,
    ),
];

/// Snapshot every `AURA_*` variable in the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

/// Apply environment fallbacks to `merged`.
///
/// A variable applies when the field in `merged` still equals the field in
/// `defaults` (or is absent from both). Empty values are ignored. Returns the
/// names of the variables that were applied.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] when a numeric variable does not
/// parse.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    defaults: &toml::Value,
    env: &HashMap<String, String>,
) -> ConfigResult<Vec<String>> {
    let mut applied = Vec::new();
    for (name, path, kind) in FALLBACKS {
        let Some(raw) = env.get(*name).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
            continue;
        };
        if get_nested(merged, path) != get_nested(defaults, path) {
            debug!(var = name, "config file already sets this field; ignoring env var");
            continue;
        }
        let value = match kind {
            EnvKind::Str => toml::Value::String(raw.to_owned()),
            EnvKind::Float => {
                let parsed: f64 = raw.parse().map_err(|_| ConfigError::ValidationError {
                    field: (*name).to_owned(),
                    message: format!("'{raw}' is not a number"),
                })?;
                toml::Value::Float(parsed)
            },
        };
        set_nested(merged, path, value);
        applied.push((*name).to_owned());
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn defaults() -> toml::Value {
        toml::from_str(
            r#"
            [vfs]
            default_encryption_key = "quantum-encryption-key"
            [logging]
            level = "warn"
            [terminal.effects]
            speed = 1.0
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_env_fills_default_fields() {
        let defaults = defaults();
        let mut merged = defaults.clone();
        let applied = apply_env_fallbacks(
            &mut merged,
            &defaults,
            &env(&[
                ("AURA_LOG_LEVEL", "debug"),
                ("AURA_DATA_DIR", "/tmp/aura"),
                ("AURA_EFFECT_SPEED", "0"),
            ]),
        )
        .unwrap();

        assert_eq!(applied.len(), 3);
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(merged["storage"]["data_dir"].as_str(), Some("/tmp/aura"));
        assert_eq!(merged["terminal"]["effects"]["speed"].as_float(), Some(0.0));
    }

    #[test]
    fn test_file_value_beats_env() {
        let defaults = defaults();
        let mut merged = defaults.clone();
        set_nested(
            &mut merged,
            &["vfs", "default_encryption_key"],
            toml::Value::String("from-file".into()),
        );
        let applied = apply_env_fallbacks(
            &mut merged,
            &defaults,
            &env(&[("AURA_ENCRYPTION_KEY", "from-env")]),
        )
        .unwrap();

        assert!(applied.is_empty());
        assert_eq!(
            merged["vfs"]["default_encryption_key"].as_str(),
            Some("from-file")
        );
    }

    #[test]
    fn test_bad_speed_rejected() {
        let defaults = defaults();
        let mut merged = defaults.clone();
        let err = apply_env_fallbacks(
            &mut merged,
            &defaults,
            &env(&[("AURA_EFFECT_SPEED", "fast")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "AURA_EFFECT_SPEED"));
    }

    #[test]
    fn test_empty_value_ignored() {
        let defaults = defaults();
        let mut merged = defaults.clone();
        let applied =
            apply_env_fallbacks(&mut merged, &defaults, &env(&[("AURA_LOG_LEVEL", "  ")])).unwrap();
        assert!(applied.is_empty());
    }
}
