//! DOM access helpers shared by the probes.

use super::ProbeError;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// Get the global window object.
pub fn window() -> Result<Window, ProbeError> {
    web_sys::window().ok_or(ProbeError::Unavailable("window"))
}

pub fn document() -> Result<Document, ProbeError> {
    window()?.document().ok_or(ProbeError::Unavailable("document"))
}

/// Create a detached canvas of the given size. It is never attached to the
/// page and is dropped with the last JS reference.
pub fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement, ProbeError> {
    let canvas: HtmlCanvasElement = document()?
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| ProbeError::Unavailable("HTMLCanvasElement"))?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, ProbeError> {
    canvas
        .get_context("2d")?
        .ok_or(ProbeError::Unavailable("2d context"))?
        .dyn_into()
        .map_err(|_| ProbeError::Unavailable("2d context"))
}

/// Read a property that web-sys does not bind (e.g. `navigator.deviceMemory`).
/// `undefined` and `null` read as `None`.
pub fn get_property(target: &JsValue, prop: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(prop))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}
