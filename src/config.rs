//! Runtime configuration for the fingerprint engine and stream client.
//!
//! Both structs deserialize from plain JS objects; every field is optional
//! and falls back to its default.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// localStorage key holding the cached fingerprint.
pub const DEFAULT_STORAGE_KEY: &str = "widget_fingerprint";

/// Cached fingerprints live for 24 hours.
pub const DEFAULT_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Returned instead of a fingerprint when the pipeline fails outright.
pub const FALLBACK_FINGERPRINT: &str = "error-fallback";

/// Fingerprint engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    pub storage_key: String,
    pub ttl_ms: u64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Number of trailing data-URL characters kept as the canvas signature.
    pub canvas_signature_len: usize,
    /// Use WebCrypto `subtle.digest` when the page exposes it.
    pub prefer_web_crypto: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            ttl_ms: DEFAULT_TTL_MS,
            canvas_width: 200,
            canvas_height: 50,
            canvas_signature_len: 50,
            prefer_web_crypto: true,
        }
    }
}

impl FingerprintConfig {
    /// Read a config from a JS options object. `undefined`, `null` and
    /// malformed objects all yield the defaults.
    pub fn from_js(options: JsValue) -> Self {
        if options.is_undefined() || options.is_null() {
            return Self::default();
        }
        serde_wasm_bindgen::from_value(options).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed fingerprint options: {}", e);
            Self::default()
        })
    }
}

/// Streaming request configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Extra request headers, sent in order.
    pub headers: Vec<(String, String)>,
    /// When set, a fingerprint is generated and sent under this header.
    pub fingerprint_header: Option<String>,
    /// Engine settings for that fingerprint. Pass the same object given to
    /// `generate_fingerprint` so both share one cache entry.
    pub fingerprint: Option<FingerprintConfig>,
}

impl StreamConfig {
    pub fn fingerprint_config(&self) -> FingerprintConfig {
        self.fingerprint.clone().unwrap_or_default()
    }

    pub fn from_js(options: JsValue) -> Self {
        if options.is_undefined() || options.is_null() {
            return Self::default();
        }
        serde_wasm_bindgen::from_value(options).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed stream options: {}", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FingerprintConfig::default();
        assert_eq!(config.storage_key, "widget_fingerprint");
        assert_eq!(config.ttl_ms, 86_400_000);
        assert_eq!((config.canvas_width, config.canvas_height), (200, 50));
        assert_eq!(config.canvas_signature_len, 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FingerprintConfig = serde_json::from_str(r#"{"ttl_ms": 1000}"#).unwrap();
        assert_eq!(config.ttl_ms, 1000);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);

        let stream: StreamConfig =
            serde_json::from_str(r#"{"fingerprint_header": "X-Fingerprint"}"#).unwrap();
        assert_eq!(stream.fingerprint_header.as_deref(), Some("X-Fingerprint"));
        assert!(stream.headers.is_empty());
        assert_eq!(stream.fingerprint_config(), FingerprintConfig::default());
    }

    #[test]
    fn test_stream_fingerprint_settings_pass_through() {
        let stream: StreamConfig = serde_json::from_str(
            r#"{"fingerprint_header": "X-Fingerprint", "fingerprint": {"storage_key": "shop_fp", "ttl_ms": 60000}}"#,
        )
        .unwrap();
        let fingerprint = stream.fingerprint_config();
        assert_eq!(fingerprint.storage_key, "shop_fp");
        assert_eq!(fingerprint.ttl_ms, 60_000);
        assert_eq!(fingerprint.canvas_signature_len, 50);
    }
}
