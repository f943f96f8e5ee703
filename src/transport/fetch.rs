//! `fetch()` response bodies as byte-chunk streams.

use crate::error::{js_message, Result, WidgetError};
use futures::stream::{self, LocalBoxStream, StreamExt};
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Request, RequestInit, RequestMode, Response};

/// Response body chunks, in arrival order.
pub type ByteStream = LocalBoxStream<'static, Result<Vec<u8>>>;

/// POST `body` as JSON to `url` and return the response body stream.
///
/// Non-2xx responses and missing bodies are errors; nothing is retried.
pub async fn open_stream(url: &str, body: &str, headers: &[(String, String)]) -> Result<ByteStream> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| WidgetError::Transport(format!("Request creation failed: {}", js_message(&e))))?;

    let request_headers = request.headers();
    request_headers
        .set("Content-Type", "application/json")
        .map_err(|e| WidgetError::from_js(&e))?;
    for (name, value) in headers {
        request_headers
            .set(name, value)
            .map_err(|e| WidgetError::Config(format!("Invalid header {}: {}", name, js_message(&e))))?;
    }

    let window = web_sys::window().ok_or_else(|| WidgetError::Transport("No window object".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| WidgetError::Transport(js_message(&e)))?
        .dyn_into()
        .map_err(|_| WidgetError::Transport("fetch did not return a Response".into()))?;

    if !response.ok() {
        return Err(WidgetError::HttpStatus {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    let body = response.body().ok_or(WidgetError::MissingBody)?;
    let reader: ReadableStreamDefaultReader = body.get_reader().unchecked_into();

    Ok(reader_stream(reader))
}

/// Pull chunks from `reader` until `{done: true}` or a read error.
/// A read error is yielded once and ends the stream.
fn reader_stream(reader: ReadableStreamDefaultReader) -> ByteStream {
    stream::unfold(Some(reader), |state| async move {
        let reader = state?;
        let result = match JsFuture::from(reader.read()).await {
            Ok(result) => result,
            Err(e) => return Some((Err(WidgetError::Transport(js_message(&e))), None)),
        };

        let done = Reflect::get(&result, &JsValue::from_str("done"))
            .ok()
            .and_then(|d| d.as_bool())
            .unwrap_or(true);
        if done {
            return None;
        }

        let chunk = Reflect::get(&result, &JsValue::from_str("value"))
            .ok()
            .and_then(|v| v.dyn_into::<Uint8Array>().ok())
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();

        Some((Ok(chunk), Some(reader)))
    })
    .boxed_local()
}
