//! Bridge from `aura_config::Config` to domain types.

use std::path::Path;
use std::sync::Arc;

use aura_config::{Config, StorageBackend};
use aura_storage::{FileKvStore, KvStore, MemoryKvStore, StorageResult};
use aura_telemetry::{LogConfig, LogFormat};
use aura_terminal::TerminalSettings;
use aura_vfs::VfsSettings;
use tracing::info;

/// Convert config to [`VfsSettings`].
pub(crate) fn to_vfs_settings(cfg: &Config) -> VfsSettings {
    VfsSettings {
        default_encryption_key: cfg.vfs.default_encryption_key.clone(),
        recent_limit: cfg.vfs.recent_limit,
    }
}

/// Convert config to [`TerminalSettings`].
pub(crate) fn to_terminal_settings(cfg: &Config) -> TerminalSettings {
    let t = &cfg.terminal;
    TerminalSettings {
        home_directory: t.home_directory.clone(),
        history_limit: t.history_limit,
        output_limit: t.output_limit,
        system_paths: t.system_paths.clone(),
        apps: t.apps.clone(),
        effect_speed: t.effects.speed,
    }
}

/// Convert config to [`LogConfig`].
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let format = cfg.logging.format.parse().unwrap_or(LogFormat::Compact);
    let mut log_config = LogConfig::new(cfg.logging.level.to_ascii_lowercase()).with_format(format);

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

/// Open the configured store.
///
/// `force_memory` overrides the configured backend.
pub(crate) fn open_store(
    backend: StorageBackend,
    data_dir: &Path,
    force_memory: bool,
) -> StorageResult<Arc<dyn KvStore>> {
    if force_memory || backend == StorageBackend::Memory {
        info!("using in-memory storage; nothing will be saved");
        return Ok(Arc::new(MemoryKvStore::new()));
    }
    let store = FileKvStore::open(data_dir)?;
    info!(dir = %data_dir.display(), "using file storage");
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.terminal.history_limit = 7;
        cfg.terminal.effects.speed = 0.0;
        cfg.terminal.apps.push("browser".into());

        let settings = to_terminal_settings(&cfg);
        assert_eq!(settings.history_limit, 7);
        assert!(settings.is_known_app("browser"));
        assert_eq!(settings.effect_delay(500), std::time::Duration::ZERO);
    }

    #[test]
    fn test_default_config_matches_domain_defaults() {
        let cfg = Config::default();
        assert_eq!(to_terminal_settings(&cfg), TerminalSettings::default());
        let vfs = to_vfs_settings(&cfg);
        let domain = VfsSettings::default();
        assert_eq!(vfs.default_encryption_key, domain.default_encryption_key);
        assert_eq!(vfs.recent_limit, domain.recent_limit);
    }

    #[test]
    fn test_log_config_conversion() {
        let mut cfg = Config::default();
        cfg.logging.level = "DEBUG".into();
        cfg.logging.format = "json".into();
        cfg.logging.directives = vec!["aura_vfs=trace".into()];

        let lc = to_log_config(&cfg);
        assert_eq!(lc.level, "debug");
        assert_eq!(lc.format, LogFormat::Json);
        assert_eq!(lc.directives, vec!["aura_vfs=trace"]);
    }

    #[test]
    fn test_open_store_backends() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");

        let store = open_store(StorageBackend::File, &data, false).unwrap();
        store.set("probe", "1".into()).unwrap();
        assert!(data.join("probe.json").exists());

        let store = open_store(StorageBackend::File, &dir.path().join("unused"), true).unwrap();
        store.set("probe", "1".into()).unwrap();
        assert!(!dir.path().join("unused").exists());
    }
}
