//! Passphrase encryption over BLAKE3.
//!
//! Each message gets a fresh random salt and nonce. The salt feeds subkey
//! derivation from the passphrase; the encryption subkey keys a BLAKE3 XOF
//! over the nonce to produce the keystream, and the authentication subkey
//! produces a keyed-hash tag over `salt || nonce || ciphertext`.
//!
//! Envelope: `aura1:` followed by base64 of
//! `salt (16) || nonce (16) || ciphertext || tag (32)`.
//!
//! This is obfuscation grade. Key derivation is a single fast hash with no
//! stretching, so a weak passphrase falls to offline guessing, and the
//! construction is not a reviewed AEAD. Do not use it to protect secrets.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use crate::error::{CryptoError, CryptoResult};
use crate::key::ContentKey;

/// Prefix identifying the envelope version.
pub const ENVELOPE_PREFIX: &str = "aura1:";

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 16;
const TAG_LEN: usize = 32;
const OVERHEAD: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` under `key`, returning a text-safe envelope.
#[must_use]
pub fn encrypt(plaintext: &str, key: &ContentKey) -> String {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let keys = key.derive(&salt);
    let mut body = plaintext.as_bytes().to_vec();
    apply_keystream(&keys.encryption, &nonce, &mut body);
    let tag = compute_tag(&keys.authentication, &salt, &nonce, &body);

    let mut envelope = Vec::with_capacity(body.len().saturating_add(OVERHEAD));
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&body);
    envelope.extend_from_slice(&tag);

    format!("{ENVELOPE_PREFIX}{}", STANDARD.encode(envelope))
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CryptoError::InvalidFormat`] for a malformed envelope,
/// [`CryptoError::AuthenticationFailed`] for a wrong key or tampered data,
/// and [`CryptoError::InvalidUtf8`] if the plaintext is not text.
pub fn decrypt(envelope: &str, key: &ContentKey) -> CryptoResult<String> {
    let encoded = envelope
        .trim()
        .strip_prefix(ENVELOPE_PREFIX)
        .ok_or_else(|| CryptoError::InvalidFormat("missing envelope prefix".into()))?;
    let raw = STANDARD.decode(encoded)?;

    let body_len = raw
        .len()
        .checked_sub(OVERHEAD)
        .ok_or_else(|| {
            CryptoError::InvalidFormat(format!("envelope too short ({} bytes)", raw.len()))
        })?;
    let (salt, rest) = raw.split_at(SALT_LEN);
    let (nonce, rest) = rest.split_at(NONCE_LEN);
    let (body, tag) = rest.split_at(body_len);

    let keys = key.derive(salt);
    let expected = compute_tag(&keys.authentication, salt, nonce, body);
    if !bool::from(expected.as_slice().ct_eq(tag)) {
        return Err(CryptoError::AuthenticationFailed);
    }

    let mut plain = body.to_vec();
    apply_keystream(&keys.encryption, nonce, &mut plain);
    String::from_utf8(plain).map_err(|_| CryptoError::InvalidUtf8)
}

/// Whether `text` looks like an envelope from [`encrypt`].
#[must_use]
pub fn is_envelope(text: &str) -> bool {
    text.trim_start().starts_with(ENVELOPE_PREFIX)
}

fn apply_keystream(key: &[u8; 32], nonce: &[u8], data: &mut [u8]) {
    let mut hasher = blake3::Hasher::new_keyed(key);
    hasher.update(nonce);
    let mut reader = hasher.finalize_xof();
    let mut block = [0u8; 64];
    for chunk in data.chunks_mut(block.len()) {
        reader.fill(&mut block);
        for (byte, pad) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= pad;
        }
    }
}

fn compute_tag(key: &[u8; 32], salt: &[u8], nonce: &[u8], body: &[u8]) -> [u8; TAG_LEN] {
    let mut hasher = blake3::Hasher::new_keyed(key);
    hasher.update(salt);
    hasher.update(nonce);
    hasher.update(body);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pass: &str) -> ContentKey {
        ContentKey::new(pass).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt() {
        let k = key("quantum-encryption-key");
        let sealed = encrypt("meet at the oracle", &k);
        assert!(is_envelope(&sealed));
        assert!(!sealed.contains("oracle"));
        assert_eq!(decrypt(&sealed, &k).unwrap(), "meet at the oracle");
    }

    #[test]
    fn test_fresh_nonce_per_message() {
        let k = key("k");
        assert_ne!(encrypt("same", &k), encrypt("same", &k));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = encrypt("secret", &key("right"));
        assert!(matches!(
            decrypt(&sealed, &key("wrong")),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_tampering_detected() {
        let k = key("k");
        let sealed = encrypt("a longer secret message", &k);
        let mut raw = STANDARD
            .decode(sealed.strip_prefix(ENVELOPE_PREFIX).unwrap())
            .unwrap();
        let first_body_byte = SALT_LEN.saturating_add(NONCE_LEN);
        raw[first_body_byte] ^= 0x01;
        let forged = format!("{ENVELOPE_PREFIX}{}", STANDARD.encode(raw));
        assert!(matches!(
            decrypt(&forged, &k),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_malformed_envelopes() {
        let k = key("k");
        assert!(matches!(
            decrypt("plain text", &k),
            Err(CryptoError::InvalidFormat(_))
        ));
        assert!(matches!(
            decrypt("aura1:AAAA", &k),
            Err(CryptoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_long_message_spans_blocks() {
        let k = key("k");
        let text = "0123456789".repeat(50);
        assert_eq!(decrypt(&encrypt(&text, &k), &k).unwrap(), text);
    }
}
