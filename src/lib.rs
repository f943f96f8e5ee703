//! # Chat Widget WASM Core
//!
//! Browser-side core of the chat widget, compiled to WebAssembly.
//!
//! Two independent components:
//!
//! - [`fingerprint`]: collects device/browser signals, hashes them and
//!   caches the identifier for 24 hours. Sent with outbound requests as a
//!   soft anti-abuse signal.
//! - [`stream`]: decodes the newline-delimited `data: {...}` token streams
//!   served by the chat and order-tracking endpoints.
//!
//! ## Architecture
//!
//! ```text
//! chat UI (JS)
//!   ↓ generate_fingerprint()         ↓ stream_chat(base, body, callbacks)
//! FingerprintEngine                 transport::open_stream (fetch)
//!   ↓ probes → SHA-256                ↓ byte chunks
//! localStorage cache                EventStreamDecoder → JS callbacks
//! ```
//!
//! Both components are usable from Rust with injected stores, signal
//! sources and byte streams; the `#[wasm_bindgen]` functions below wire them
//! to the live browser.

use wasm_bindgen::prelude::*;

// Modules
pub mod config;
mod error;
pub mod fingerprint;
pub mod runtime;
pub mod storage;
pub mod stream;
pub mod transport;

pub use config::{FingerprintConfig, StreamConfig, DEFAULT_TTL_MS, FALLBACK_FINGERPRINT};
pub use error::{ErrorCode, ErrorInfo, Result, WidgetError};
pub use fingerprint::{
    BrowserSignals, CachedFingerprint, FingerprintComponents, FingerprintEngine, ProbeError, SignalSource,
};
pub use runtime::{Clock, EpochMillis, ManualClock, SystemClock};
pub use storage::{KeyValueStore, LocalStorageStore, MemoryStore};
pub use stream::{
    decode_stream, EventStreamDecoder, JsCallbacks, StreamEvent, StreamHandler, StreamOutcome, Termination,
};

/// Initialize the widget core
///
/// Sets up console logging.
#[wasm_bindgen(start)]
pub fn init() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by the host page
        return;
    }

    log::info!("Widget WASM core initialized");
}

/// Generate (or fetch from cache) the device fingerprint.
///
/// `options` is an optional `FingerprintConfig` object. Never rejects:
/// failures resolve to `"error-fallback"`.
#[wasm_bindgen]
pub async fn generate_fingerprint(options: JsValue) -> String {
    let config = FingerprintConfig::from_js(options);
    FingerprintEngine::browser(&config).generate().await
}

/// Delete the cached fingerprint.
#[wasm_bindgen]
pub fn invalidate_fingerprint(options: JsValue) -> std::result::Result<(), JsValue> {
    let config = FingerprintConfig::from_js(options);
    FingerprintEngine::browser(&config).invalidate()?;
    Ok(())
}

/// Collect the raw fingerprint components without hashing or caching.
#[wasm_bindgen]
pub fn fingerprint_components(options: JsValue) -> std::result::Result<JsValue, JsValue> {
    let config = FingerprintConfig::from_js(options);
    let components = FingerprintEngine::browser(&config).components();
    serde_wasm_bindgen::to_value(&components).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// POST `body` to `url` and stream its events into `callbacks`.
///
/// `callbacks` = `{ onToken, onSources, onThinking?, onFinalResponse?,
/// onComplete, onError }`. Resolves with `{ termination, chunks, lines,
/// events, skipped }` once the stream ends; transport failures are delivered
/// to `onError`, not as a rejection. Rejects only when a required callback
/// is missing.
#[wasm_bindgen]
pub async fn stream_events(
    url: String,
    body: JsValue,
    callbacks: JsValue,
    options: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let mut handler = JsCallbacks::from_object(&callbacks)?;
    let body = request_body(&body)?;
    let config = StreamConfig::from_js(options);

    let outcome = transport::stream_request(&url, &body, &config, &mut handler).await;
    serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Stream a chat completion from `{base_url}/chat/stream`.
#[wasm_bindgen]
pub async fn stream_chat(
    base_url: String,
    body: JsValue,
    callbacks: JsValue,
    options: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let url = transport::endpoint(&base_url, transport::CHAT_STREAM_PATH);
    stream_events(url, body, callbacks, options).await
}

/// Stream an order-tracking answer from `{base_url}/order-tracking/stream`.
#[wasm_bindgen]
pub async fn stream_order_tracking(
    base_url: String,
    body: JsValue,
    callbacks: JsValue,
    options: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let url = transport::endpoint(&base_url, transport::ORDER_TRACKING_STREAM_PATH);
    stream_events(url, body, callbacks, options).await
}

/// Strings are sent as-is; anything else goes through `JSON.stringify`.
fn request_body(body: &JsValue) -> Result<String> {
    if let Some(s) = body.as_string() {
        return Ok(s);
    }
    js_sys::JSON::stringify(body)
        .map(String::from)
        .map_err(|e| WidgetError::from_js(&e))
}
