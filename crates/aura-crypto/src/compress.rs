//! Text-safe compression: deflate, then standard base64.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::error::{CryptoError, CryptoResult};

/// Compress `text` into a base64 string that is safe to store as JSON text.
///
/// # Errors
///
/// Returns [`CryptoError::Compression`] if the deflate stream cannot be written.
pub fn compress(text: &str) -> CryptoResult<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .map_err(|e| CryptoError::Compression(e.to_string()))?;
    let bytes = encoder
        .finish()
        .map_err(|e| CryptoError::Compression(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}

/// Reverse [`compress`].
///
/// # Errors
///
/// Returns [`CryptoError::InvalidBase64Encoding`], [`CryptoError::Compression`]
/// for a corrupt stream, or [`CryptoError::InvalidUtf8`].
pub fn decompress(encoded: &str) -> CryptoResult<String> {
    let bytes = STANDARD.decode(encoded.trim())?;
    let mut decoder = DeflateDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CryptoError::Compression(e.to_string()))?;
    String::from_utf8(out).map_err(|_| CryptoError::InvalidUtf8)
}
