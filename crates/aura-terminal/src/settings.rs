//! Terminal tunables.

use std::time::Duration;

use crate::output::DEFAULT_OUTPUT_LIMIT;

/// Default home directory.
pub const DEFAULT_HOME: &str = "/home/aura/";

/// Default length of the command history.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Directories that exist without a folder record.
pub const DEFAULT_SYSTEM_PATHS: &[&str] = &[
    "/",
    "/home/",
    "/home/aura/",
    "/home/aura/documents/",
    "/home/aura/projects/",
    "/usr/",
    "/system/",
];

/// Applications `launch` accepts.
pub const DEFAULT_APPS: &[&str] = &["notepad", "filemanager", "settings"];

/// Upper bound on the effect delay multiplier.
pub const MAX_EFFECT_SPEED: f64 = 100.0;

/// Tunables for the dispatcher and its session.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalSettings {
    /// Directory `cd` with no argument (and `~`) resolves to.
    pub home_directory: String,
    /// Maximum number of history entries kept.
    pub history_limit: usize,
    /// Maximum number of records in an output log.
    pub output_limit: usize,
    /// Directories that always exist.
    pub system_paths: Vec<String>,
    /// Launchable application ids.
    pub apps: Vec<String>,
    /// Multiplier for effect delays; `0` disables them.
    pub effect_speed: f64,
}

impl TerminalSettings {
    /// Default settings with effect delays disabled.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            effect_speed: 0.0,
            ..Self::default()
        }
    }

    /// Scale a nominal effect delay by [`effect_speed`](Self::effect_speed).
    #[must_use]
    pub fn effect_delay(&self, nominal_ms: u64) -> Duration {
        let speed = self.effect_speed;
        if !speed.is_finite() || speed <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_millis(nominal_ms).mul_f64(speed.min(MAX_EFFECT_SPEED))
    }

    /// Whether `dir` is one of the built-in directories.
    #[must_use]
    pub fn is_system_path(&self, dir: &str) -> bool {
        self.system_paths.iter().any(|p| p == dir)
    }

    /// Whether `app` may be launched.
    #[must_use]
    pub fn is_known_app(&self, app: &str) -> bool {
        self.apps.iter().any(|a| a == app)
    }
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            home_directory: DEFAULT_HOME.to_owned(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            output_limit: DEFAULT_OUTPUT_LIMIT,
            system_paths: DEFAULT_SYSTEM_PATHS.iter().map(|s| (*s).to_owned()).collect(),
            apps: DEFAULT_APPS.iter().map(|s| (*s).to_owned()).collect(),
            effect_speed: 1.0,
        }
    }
}
