//! WebGL vendor/renderer probe

use super::dom;
use super::ProbeError;
use wasm_bindgen::JsCast;
use web_sys::WebGlRenderingContext;

/// Reported when a context exists but `WEBGL_debug_renderer_info` does not.
pub const NO_DEBUG_INFO: &str = "no-debug-info";

// WEBGL_debug_renderer_info constants
const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

/// `"vendor~renderer"`, `"no-debug-info"`, or `""` when WebGL is absent.
pub fn probe_webgl() -> Result<String, ProbeError> {
    let canvas = dom::create_canvas(1, 1)?;

    let context = match canvas.get_context("webgl")? {
        Some(ctx) => Some(ctx),
        None => canvas.get_context("experimental-webgl")?,
    };
    let gl: WebGlRenderingContext = match context {
        Some(ctx) => ctx
            .dyn_into()
            .map_err(|_| ProbeError::Unavailable("WebGLRenderingContext"))?,
        None => return Ok(String::new()),
    };

    if gl.get_extension("WEBGL_debug_renderer_info")?.is_none() {
        return Ok(NO_DEBUG_INFO.to_string());
    }

    let vendor = gl.get_parameter(UNMASKED_VENDOR_WEBGL)?.as_string().unwrap_or_default();
    let renderer = gl.get_parameter(UNMASKED_RENDERER_WEBGL)?.as_string().unwrap_or_default();
    Ok(format_webgl(&vendor, &renderer))
}

pub fn format_webgl(vendor: &str, renderer: &str) -> String {
    format!("{}~{}", vendor, renderer)
}
