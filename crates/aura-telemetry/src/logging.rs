//! Logging configuration and setup.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::error::{TelemetryError, TelemetryResult};

/// File name prefix for file logging, producing `aura.log.2026-01-15`.
const LOG_FILE_PREFIX: &str = "aura.log";

fn init_err<E: std::fmt::Display>(e: E) -> TelemetryError {
    TelemetryError::InitError(e.to_string())
}

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable format.
    Pretty,
    /// Compact single-line format (default).
    #[default]
    Compact,
    /// JSON format for structured logging.
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::ConfigError(format!(
                "unknown log format '{other}'"
            ))),
        }
    }
}

/// Log output target.
///
/// The interactive terminal owns stdout, so logs never go there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stderr.
    #[default]
    Stderr,
    /// Log to daily-rotated files in a directory.
    File(PathBuf),
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base level filter (e.g., "info", "debug", "trace").
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
    /// Log target.
    #[serde(default)]
    pub target: LogTarget,
    /// Whether to include timestamps.
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Whether to use ANSI colors.
    #[serde(default = "default_true")]
    pub ansi: bool,
    /// Directive overrides (e.g., `aura_vfs=debug`).
    #[serde(default)]
    pub directives: Vec<String>,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            timestamps: true,
            ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Create a new log config with the specified level.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Set the log format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Log to daily-rotated files under `directory`.
    #[must_use]
    pub fn with_file_logging(mut self, directory: impl Into<PathBuf>) -> Self {
        self.target = LogTarget::File(directory.into());
        // No escape codes in files.
        self.ansi = false;
        self
    }

    /// Add a directive override.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Disable timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Disable ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Build the env filter from config.
    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;

        for directive in &self.directives {
            filter = filter.add_directive(directive.parse().map_err(
                |e: tracing_subscriber::filter::ParseError| {
                    TelemetryError::ConfigError(e.to_string())
                },
            )?);
        }

        Ok(filter)
    }

    /// Build the formatting layer for `writer`.
    fn fmt_layer<W>(&self, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let base = fmt::layer().with_writer(writer).with_ansi(self.ansi);
        match (self.format, self.timestamps) {
            (LogFormat::Json, true) => base.json().boxed(),
            (LogFormat::Json, false) => base.json().without_time().boxed(),
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => base.compact().boxed(),
            (LogFormat::Compact, false) => base.compact().without_time().boxed(),
        }
    }
}

/// Set up logging with the given configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log directory cannot
/// be created, or a global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;

    let layer = match &config.target {
        LogTarget::Stderr => config.fmt_layer(std::io::stderr),
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                TelemetryError::ConfigError(format!("failed to create log directory: {e}"))
            })?;
            config.fmt_layer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
        },
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(init_err)
}

/// Set up default logging (info level, stderr, compact format).
///
/// # Errors
///
/// Returns an error if logging cannot be initialized.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.target, LogTarget::Stderr);
        assert!(config.timestamps);
        assert!(config.ansi);
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .without_timestamps()
            .with_directive("aura_vfs=trace")
            .with_file_logging("/tmp/aura-logs");

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.timestamps);
        assert!(!config.ansi);
        assert_eq!(config.directives, vec!["aura_vfs=trace"]);
        assert_eq!(config.target, LogTarget::File("/tmp/aura-logs".into()));
    }

    #[test]
    fn test_log_config_serialization() {
        let config = LogConfig::new("warn").with_format(LogFormat::Pretty);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"level\":\"warn\""));
        assert!(json.contains("\"format\":\"pretty\""));

        let parsed: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.format, LogFormat::Pretty);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_build_filter() {
        let config = LogConfig::new("debug").with_directive("aura_terminal=trace");
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn test_build_filter_invalid() {
        // EnvFilter is permissive with unknown targets, so use invalid syntax.
        let config = LogConfig::new("debug").with_directive("[invalid=syntax");
        assert!(config.build_filter().is_err());
    }

    #[test]
    fn test_file_target_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let config = LogConfig::new("info").with_file_logging(&logs);
        // A subscriber may already be installed by another test; only the
        // directory side effect is checked.
        let _ = setup_logging(&config);
        assert!(logs.is_dir());
    }
}
