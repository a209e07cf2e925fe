//! Ordered content transform pipeline.
//!
//! Writes apply the steps in order; reads undo them in strict reverse order.
//! The canonical order is [`Transform::Compress`] then [`Transform::Encrypt`],
//! so ciphertext is never fed to the compressor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cipher;
use crate::compress;
use crate::error::{CryptoError, CryptoResult};
use crate::key::ContentKey;

/// A single reversible content transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Deflate plus base64.
    Compress,
    /// Passphrase encryption.
    Encrypt,
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compress => write!(f, "compress"),
            Self::Encrypt => write!(f, "encrypt"),
        }
    }
}

/// An ordered list of transforms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformPipeline {
    steps: Vec<Transform>,
}

impl TransformPipeline {
    /// Pipeline with no steps.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build the canonical pipeline from the two record flags.
    #[must_use]
    pub fn from_flags(compress: bool, encrypt: bool) -> Self {
        let mut steps = Vec::with_capacity(2);
        if compress {
            steps.push(Transform::Compress);
        }
        if encrypt {
            steps.push(Transform::Encrypt);
        }
        Self { steps }
    }

    /// The steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[Transform] {
        &self.steps
    }

    /// Whether the pipeline contains `step`.
    #[must_use]
    pub fn contains(&self, step: Transform) -> bool {
        self.steps.contains(&step)
    }

    /// Whether applying the pipeline needs a key.
    #[must_use]
    pub fn needs_key(&self) -> bool {
        self.contains(Transform::Encrypt)
    }

    /// Apply every step in order.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingKey`] if an encrypt step has no key, or
    /// any error from the compressor.
    pub fn apply(&self, plaintext: &str, key: Option<&ContentKey>) -> CryptoResult<String> {
        let mut text = plaintext.to_owned();
        for step in &self.steps {
            text = match step {
                Transform::Compress => compress::compress(&text)?,
                Transform::Encrypt => cipher::encrypt(&text, key.ok_or(CryptoError::MissingKey)?),
            };
        }
        Ok(text)
    }

    /// Undo every step in reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingKey`] if a decrypt step has no key, or
    /// any error from decryption or decompression.
    pub fn reverse(&self, stored: &str, key: Option<&ContentKey>) -> CryptoResult<String> {
        let mut text = stored.to_owned();
        for step in self.steps.iter().rev() {
            text = match step {
                Transform::Compress => compress::decompress(&text)?,
                Transform::Encrypt => cipher::decrypt(&text, key.ok_or(CryptoError::MissingKey)?)?,
            };
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &["", "hello", "line one\nline two ✓", "{\"k\": [1, 2, 3]}"];

    #[test]
    fn test_all_flag_combinations_round_trip() {
        let key = ContentKey::new("quantum-encryption-key").unwrap();
        for compress in [false, true] {
            for encrypt in [false, true] {
                let pipeline = TransformPipeline::from_flags(compress, encrypt);
                for sample in SAMPLES {
                    let stored = pipeline.apply(sample, Some(&key)).unwrap();
                    let back = pipeline.reverse(&stored, Some(&key)).unwrap();
                    assert_eq!(&back, sample, "compress={compress} encrypt={encrypt}");
                }
            }
        }
    }

    #[test]
    fn test_compress_runs_before_encrypt() {
        let pipeline = TransformPipeline::from_flags(true, true);
        assert_eq!(pipeline.steps(), &[Transform::Compress, Transform::Encrypt]);

        let key = ContentKey::new("k").unwrap();
        let stored = pipeline.apply("abc", Some(&key)).unwrap();
        // The outermost layer is the cipher envelope.
        assert!(cipher::is_envelope(&stored));
        let inner = cipher::decrypt(&stored, &key).unwrap();
        assert_eq!(compress::decompress(&inner).unwrap(), "abc");
    }

    #[test]
    fn test_identity_is_passthrough() {
        let pipeline = TransformPipeline::identity();
        assert!(!pipeline.needs_key());
        assert_eq!(pipeline.apply("x", None).unwrap(), "x");
    }

    #[test]
    fn test_missing_key() {
        let pipeline = TransformPipeline::from_flags(false, true);
        assert!(matches!(
            pipeline.apply("x", None),
            Err(CryptoError::MissingKey)
        ));
    }

    #[test]
    fn test_wrong_key_on_reverse() {
        let pipeline = TransformPipeline::from_flags(true, true);
        let right = ContentKey::new("right").unwrap();
        let wrong = ContentKey::new("wrong").unwrap();
        let stored = pipeline.apply("data", Some(&right)).unwrap();
        assert!(matches!(
            pipeline.reverse(&stored, Some(&wrong)),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_transform_serde_names() {
        let json = serde_json::to_string(&Transform::Compress).unwrap();
        assert_eq!(json, "\"compress\"");
    }
}
