//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A config file is not valid TOML, or does not fit the schema.
    #[error("failed to parse config {path}: {source}")]
    ParseError {
        /// File (or pseudo-path) that failed.
        path: String,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A value is out of range or inconsistent.
    #[error("invalid config value for {field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// The user's home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
