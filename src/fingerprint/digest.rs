//! Digest of the canonical component string.
//!
//! SHA-256 is preferred. When the configured provider is unavailable (e.g.
//! `crypto.subtle` is undefined outside secure contexts) the rolling hash
//! below is used instead: weaker, but deterministic.

use crate::error::{js_message, Result, WidgetError};
use async_trait::async_trait;
use js_sys::{ArrayBuffer, Reflect, Uint8Array};
use sha2::{Digest, Sha256};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// A SHA-256 implementation.
#[async_trait(?Send)]
pub trait DigestProvider {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Pure-Rust SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

#[async_trait(?Send)]
impl DigestProvider for Sha256Digest {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha256::digest(data).to_vec())
    }
}

/// WebCrypto `crypto.subtle.digest("SHA-256", ...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtleDigest;

#[async_trait(?Send)]
impl DigestProvider for SubtleDigest {
    async fn sha256(&self, data: &[u8]) -> Result<Vec<u8>> {
        let window = web_sys::window().ok_or_else(|| WidgetError::Digest("No window object".into()))?;
        let crypto = window
            .crypto()
            .map_err(|e| WidgetError::Digest(js_message(&e)))?;

        // Undefined outside secure contexts.
        let subtle = Reflect::get(&crypto, &JsValue::from_str("subtle"))
            .map_err(|e| WidgetError::Digest(js_message(&e)))?;
        if subtle.is_undefined() || subtle.is_null() {
            return Err(WidgetError::Digest("crypto.subtle unavailable".into()));
        }

        let input = Uint8Array::from(data);
        let promise = crypto
            .subtle()
            .digest_with_str_and_buffer_source("SHA-256", &input)
            .map_err(|e| WidgetError::Digest(js_message(&e)))?;
        let buffer: ArrayBuffer = JsFuture::from(promise)
            .await
            .map_err(|e| WidgetError::Digest(js_message(&e)))?
            .dyn_into()
            .map_err(|_| WidgetError::Digest("digest did not return an ArrayBuffer".into()))?;

        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

/// A provider that is never available. Forces the rolling-hash path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDigest;

#[async_trait(?Send)]
impl DigestProvider for NoDigest {
    async fn sha256(&self, _data: &[u8]) -> Result<Vec<u8>> {
        Err(WidgetError::Digest("no digest provider".into()))
    }
}

/// Hash `canonical` with `provider`, falling back to `rolling_hash`.
///
/// Returns 64 lowercase hex characters for SHA-256, 8 for the fallback.
pub async fn hash_canonical(provider: &dyn DigestProvider, canonical: &str) -> String {
    match provider.sha256(canonical.as_bytes()).await {
        Ok(digest) => hex::encode(digest),
        Err(e) => {
            log::debug!("SHA-256 unavailable ({}), using rolling hash", e);
            rolling_hash(canonical)
        }
    }
}

/// `h = (h << 5) - h + unit` over UTF-16 code units with 32-bit wrapping,
/// printed as the 8-digit hex of the two's complement value.
pub fn rolling_hash(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    format!("{:08x}", hash as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_sha256_known_vector() {
        let digest = block_on(hash_canonical(&Sha256Digest, "abc"));
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_rolling_hash_values() {
        assert_eq!(rolling_hash(""), "00000000");
        // 'a' = 97
        assert_eq!(rolling_hash("a"), "00000061");
        // 97 * 31 + 98 = 3105
        assert_eq!(rolling_hash("ab"), "00000c21");
    }

    #[test]
    fn test_rolling_hash_wraps() {
        let long = "x".repeat(64);
        let a = rolling_hash(&long);
        assert_eq!(a.len(), 8);
        assert_eq!(a, rolling_hash(&long));
    }

    #[test]
    fn test_rolling_hash_counts_utf16_units() {
        // U+1F600 is a surrogate pair: two units, not one scalar
        let mut expected: i32 = 0;
        for unit in [0xD83Du16, 0xDE00] {
            expected = expected.wrapping_mul(31).wrapping_add(unit as i32);
        }
        assert_eq!(rolling_hash("😀"), format!("{:08x}", expected as u32));
    }

    #[test]
    fn test_fallback_when_unavailable() {
        let value = block_on(hash_canonical(&NoDigest, "{\"a\":1}"));
        assert_eq!(value, rolling_hash("{\"a\":1}"));
        assert_eq!(value.len(), 8);
    }
}
