//! Aura Crypto: content transforms for stored files.
//!
//! This crate provides:
//! - [`TransformPipeline`], an ordered list of reversible [`Transform`]s
//!   applied on write and undone in reverse order on read
//! - text-safe compression (deflate plus base64)
//! - passphrase encryption built on BLAKE3 with a random salt and nonce per
//!   message and a constant-time checked authentication tag
//! - [`ContentKey`], a passphrase wrapper that is zeroized on drop
//!
//! All outputs are plain ASCII so they can be stored inside JSON records.
//! The encryption keeps content from casual view. It has no key stretching
//! and is not a vetted AEAD, so it is not suitable for real secrets.
//!
//! # Example
//!
//! ```
//! use aura_crypto::{ContentKey, TransformPipeline};
//!
//! let key = ContentKey::new("correct horse").unwrap();
//! let pipeline = TransformPipeline::from_flags(true, true);
//!
//! let stored = pipeline.apply("hello", Some(&key)).unwrap();
//! assert_eq!(pipeline.reverse(&stored, Some(&key)).unwrap(), "hello");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cipher;
pub mod compress;

mod error;
mod key;
mod transform;

pub use error::{CryptoError, CryptoResult};
pub use key::ContentKey;
pub use transform::{Transform, TransformPipeline};
