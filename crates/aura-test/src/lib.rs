//! Aura Test - Shared test utilities.
//!
//! Mock collaborators and ready-wired fixtures for tests across the
//! workspace.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! aura-test.workspace = true
//! ```
//!
//! Then use in integration tests:
//!
//! ```rust,ignore
//! use aura_test::TestTerminal;
//!
//! #[tokio::test]
//! async fn test_pwd() {
//!     let terminal = TestTerminal::new();
//!     let out = terminal.run("pwd").await;
//!     assert_eq!(out[0].content, "/home/aura");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
