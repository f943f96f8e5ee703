//! Canvas rendering signature
//!
//! Draws fixed text with two font/colour combinations and keeps only the
//! tail of the PNG data URL. The tail still differs across rendering stacks
//! and avoids hashing the whole encoding.

use super::dom;
use super::ProbeError;
use wasm_bindgen::JsValue;

/// Text drawn onto the probe canvas.
pub const CANVAS_TEXT: &str = "Chat widget fingerprint \u{1F916}";

pub fn probe_canvas(width: u32, height: u32, signature_len: usize) -> Result<String, ProbeError> {
    let canvas = dom::create_canvas(width, height)?;
    let ctx = dom::context_2d(&canvas)?;

    ctx.set_text_baseline("top");
    ctx.set_font("14px Arial");
    #[allow(deprecated)]
    ctx.set_fill_style(&JsValue::from_str("#f60"));
    ctx.fill_rect(125.0, 1.0, 62.0, 20.0);

    #[allow(deprecated)]
    ctx.set_fill_style(&JsValue::from_str("#069"));
    ctx.fill_text(CANVAS_TEXT, 2.0, 15.0)?;

    ctx.set_font("18px Times New Roman");
    #[allow(deprecated)]
    ctx.set_fill_style(&JsValue::from_str("rgba(102, 204, 0, 0.7)"));
    ctx.fill_text(CANVAS_TEXT, 4.0, 17.0)?;

    let data_url = canvas.to_data_url()?;
    Ok(signature_tail(&data_url, signature_len))
}

/// Last `len` characters of `data_url`.
pub fn signature_tail(data_url: &str, len: usize) -> String {
    let count = data_url.chars().count();
    data_url.chars().skip(count.saturating_sub(len)).collect()
}
