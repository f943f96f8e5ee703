//! Navigator, screen and timezone probes.

use super::dom;
use super::{NavigatorSignals, ProbeError, ScreenSignals, TimezoneSignals};
use js_sys::{Array, Date, Intl, Object};
use wasm_bindgen::JsValue;

pub fn probe_navigator() -> Result<NavigatorSignals, ProbeError> {
    let navigator = dom::window()?.navigator();
    let nav_value: &JsValue = navigator.as_ref();

    let languages = navigator
        .languages()
        .iter()
        .filter_map(|l| l.as_string())
        .collect();

    // Not every engine exposes deviceMemory
    let device_memory = dom::get_property(nav_value, "deviceMemory").and_then(|v| v.as_f64());

    let cookie_enabled = dom::get_property(nav_value, "cookieEnabled")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let hardware_concurrency = navigator.hardware_concurrency();
    let hardware_concurrency = if hardware_concurrency.is_finite() && hardware_concurrency > 0.0 {
        hardware_concurrency as u32
    } else {
        0
    };

    Ok(NavigatorSignals {
        user_agent: navigator.user_agent().unwrap_or_default(),
        language: navigator.language().unwrap_or_default(),
        languages,
        platform: navigator.platform().unwrap_or_default(),
        hardware_concurrency,
        device_memory,
        cookie_enabled,
    })
}

pub fn probe_screen() -> Result<ScreenSignals, ProbeError> {
    let screen = dom::window()?.screen()?;
    let dimension = |value: Result<i32, JsValue>| value.map(|v| v.max(0) as u32).unwrap_or(0);

    Ok(ScreenSignals {
        width: dimension(screen.width()),
        height: dimension(screen.height()),
        depth: dimension(screen.color_depth()),
    })
}

pub fn probe_timezone() -> Result<TimezoneSignals, ProbeError> {
    let offset_minutes = Date::new_0().get_timezone_offset() as i32;

    let options = Intl::DateTimeFormat::new(&Array::new(), &Object::new()).resolved_options();
    let name = dom::get_property(&options, "timeZone")
        .and_then(|v| v.as_string())
        .unwrap_or_default();

    Ok(TimezoneSignals {
        offset_minutes,
        name,
    })
}
