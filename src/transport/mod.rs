//! HTTP streaming transport
//!
//! POSTs a JSON body with `fetch`, checks the status and hands the response
//! body to the event decoder as a stream of byte chunks.

mod fetch;

pub use fetch::{open_stream, ByteStream};

use crate::config::StreamConfig;
use crate::fingerprint::FingerprintEngine;
use crate::stream::{decode_stream, StreamHandler, StreamOutcome};

/// Chat completion stream, relative to the API base URL.
pub const CHAT_STREAM_PATH: &str = "/chat/stream";

/// Order-tracking stream, relative to the API base URL.
pub const ORDER_TRACKING_STREAM_PATH: &str = "/order-tracking/stream";

/// Join a base URL and an absolute path with exactly one slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Open `url` and decode its event stream into `handler`.
///
/// Failing to open the stream (network error, non-2xx, no body) is reported
/// through `handler.on_error` exactly once, like a mid-stream failure.
pub async fn stream_request<H: StreamHandler + ?Sized>(
    url: &str,
    body: &str,
    config: &StreamConfig,
    handler: &mut H,
) -> StreamOutcome {
    let mut headers = config.headers.clone();
    if let Some(name) = &config.fingerprint_header {
        let fingerprint = FingerprintEngine::browser(&config.fingerprint_config())
            .generate()
            .await;
        headers.push((name.clone(), fingerprint));
    }

    log::debug!("Opening event stream: {}", url);
    match open_stream(url, body, &headers).await {
        Ok(source) => decode_stream(source, handler).await,
        Err(e) => {
            let message = e.to_string();
            log::error!("Failed to open event stream {}: {}", url, message);
            handler.on_error(&message);
            StreamOutcome::transport_failed()
        }
    }
}
