//! Signal probes
//!
//! Every probe is independently guarded: it returns `Result<_, ProbeError>`
//! and `collect()` substitutes the documented fallback on failure, so one
//! broken API can never affect another probe or abort generation.
//!
//! `BrowserSignals` is the web-sys implementation; tests supply their own
//! `SignalSource`.

mod canvas;
mod dom;
mod fonts;
mod navigator;
mod storage;
mod webgl;

pub use canvas::{signature_tail, CANVAS_TEXT};
pub use fonts::{detect_fonts, BASE_FONTS, FONT_CANDIDATES, FONT_TEST_SIZE, FONT_TEST_STRING};
pub use webgl::{format_webgl, NO_DEBUG_INFO};

use super::components::FingerprintComponents;
use crate::config::FingerprintConfig;
use crate::error::{js_message, WidgetError};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a probe could not produce a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("{0} unavailable")]
    Unavailable(&'static str),

    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for ProbeError {
    fn from(value: JsValue) -> Self {
        ProbeError::Js(js_message(&value))
    }
}

impl From<ProbeError> for WidgetError {
    fn from(err: ProbeError) -> Self {
        WidgetError::Probe(err.to_string())
    }
}

/// Navigator-derived signals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorSignals {
    pub user_agent: String,
    pub language: String,
    pub languages: Vec<String>,
    pub platform: String,
    pub hardware_concurrency: u32,
    pub device_memory: Option<f64>,
    pub cookie_enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenSignals {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimezoneSignals {
    /// `Date.prototype.getTimezoneOffset()`, minutes.
    pub offset_minutes: i32,
    /// IANA name from `Intl.DateTimeFormat().resolvedOptions().timeZone`.
    pub name: String,
}

/// Feature-availability probes. Each flag is false when its probe failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageSignals {
    pub session_storage: bool,
    pub local_storage: bool,
    pub indexed_db: bool,
}

/// Something that can be probed for fingerprint signals.
pub trait SignalSource {
    /// Fails when there is no environment to probe at all (no `window`).
    fn ensure_available(&self) -> Result<(), ProbeError> {
        Ok(())
    }

    fn navigator(&self) -> Result<NavigatorSignals, ProbeError>;
    fn screen(&self) -> Result<ScreenSignals, ProbeError>;
    fn timezone(&self) -> Result<TimezoneSignals, ProbeError>;
    fn storage(&self) -> Result<StorageSignals, ProbeError>;
    fn canvas(&self) -> Result<String, ProbeError>;
    fn webgl(&self) -> Result<String, ProbeError>;
    fn fonts(&self) -> Result<Vec<String>, ProbeError>;
}

fn or_fallback<T: Default>(probe: &str, result: Result<T, ProbeError>) -> T {
    result.unwrap_or_else(|e| {
        log::debug!("{} probe fell back to default: {}", probe, e);
        T::default()
    })
}

/// Run every probe in fixed order and assemble the components.
pub fn collect<P: SignalSource + ?Sized>(source: &P) -> FingerprintComponents {
    let navigator = or_fallback("navigator", source.navigator());
    let screen = or_fallback("screen", source.screen());
    let timezone = or_fallback("timezone", source.timezone());
    let storage = or_fallback("storage", source.storage());
    let canvas = or_fallback("canvas", source.canvas());
    let webgl = or_fallback("webgl", source.webgl());
    let fonts = or_fallback("fonts", source.fonts());

    FingerprintComponents {
        user_agent: navigator.user_agent,
        language: navigator.language,
        languages: navigator.languages,
        platform: navigator.platform,
        hardware_concurrency: navigator.hardware_concurrency,
        device_memory: navigator.device_memory,
        screen_width: screen.width,
        screen_height: screen.height,
        screen_depth: screen.depth,
        timezone_offset: timezone.offset_minutes,
        timezone: timezone.name,
        session_storage: storage.session_storage,
        local_storage: storage.local_storage,
        indexed_db: storage.indexed_db,
        cookie_enabled: navigator.cookie_enabled,
        canvas,
        webgl,
        fonts,
    }
}

/// Probes the live browser through web-sys.
///
/// Construction is free; `window`/`document` are resolved per probe so a
/// missing global only affects the probes that need it.
#[derive(Debug, Clone)]
pub struct BrowserSignals {
    canvas_width: u32,
    canvas_height: u32,
    canvas_signature_len: usize,
}

impl BrowserSignals {
    pub fn new(config: &FingerprintConfig) -> Self {
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            canvas_signature_len: config.canvas_signature_len,
        }
    }
}

impl Default for BrowserSignals {
    fn default() -> Self {
        Self::new(&FingerprintConfig::default())
    }
}

impl SignalSource for BrowserSignals {
    fn ensure_available(&self) -> Result<(), ProbeError> {
        dom::window().map(|_| ())
    }

    fn navigator(&self) -> Result<NavigatorSignals, ProbeError> {
        navigator::probe_navigator()
    }

    fn screen(&self) -> Result<ScreenSignals, ProbeError> {
        navigator::probe_screen()
    }

    fn timezone(&self) -> Result<TimezoneSignals, ProbeError> {
        navigator::probe_timezone()
    }

    fn storage(&self) -> Result<StorageSignals, ProbeError> {
        storage::probe_storage()
    }

    fn canvas(&self) -> Result<String, ProbeError> {
        canvas::probe_canvas(self.canvas_width, self.canvas_height, self.canvas_signature_len)
    }

    fn webgl(&self) -> Result<String, ProbeError> {
        webgl::probe_webgl()
    }

    fn fonts(&self) -> Result<Vec<String>, ProbeError> {
        fonts::probe_fonts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every probe fails except screen and fonts.
    struct PartiallyBroken;

    impl SignalSource for PartiallyBroken {
        fn navigator(&self) -> Result<NavigatorSignals, ProbeError> {
            Err(ProbeError::Unavailable("navigator"))
        }
        fn screen(&self) -> Result<ScreenSignals, ProbeError> {
            Ok(ScreenSignals { width: 1280, height: 720, depth: 30 })
        }
        fn timezone(&self) -> Result<TimezoneSignals, ProbeError> {
            Err(ProbeError::Js("RangeError".into()))
        }
        fn storage(&self) -> Result<StorageSignals, ProbeError> {
            Err(ProbeError::Js("SecurityError".into()))
        }
        fn canvas(&self) -> Result<String, ProbeError> {
            Err(ProbeError::Unavailable("2d context"))
        }
        fn webgl(&self) -> Result<String, ProbeError> {
            Err(ProbeError::Unavailable("document"))
        }
        fn fonts(&self) -> Result<Vec<String>, ProbeError> {
            Ok(vec!["Georgia".into()])
        }
    }

    #[test]
    fn test_failures_are_isolated() {
        let components = collect(&PartiallyBroken);
        assert_eq!(components.user_agent, "");
        assert_eq!(components.device_memory, None);
        assert!(!components.cookie_enabled);
        assert_eq!((components.screen_width, components.screen_height, components.screen_depth), (1280, 720, 30));
        assert_eq!(components.timezone_offset, 0);
        assert!(!components.session_storage && !components.local_storage && !components.indexed_db);
        assert_eq!(components.canvas, "");
        assert_eq!(components.webgl, "");
        assert_eq!(components.fonts, vec!["Georgia".to_string()]);
    }

    #[test]
    fn test_probe_error_into_widget_error() {
        let err: WidgetError = ProbeError::Unavailable("window").into();
        assert_eq!(err.to_string(), "Probe failed: window unavailable");
    }
}
