//! Aura Telemetry - logging setup for the Aura terminal.
//!
//! # Example
//!
//! ```rust,no_run
//! use aura_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), aura_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("aura_vfs=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
