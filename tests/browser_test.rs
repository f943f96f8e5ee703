//! Browser Integration Tests
//!
//! Run with: wasm-pack test --headless --chrome
//! (or --firefox, --safari)

#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use widget_wasm::fingerprint::probes::{detect_fonts, FONT_CANDIDATES, NO_DEBUG_INFO};
use widget_wasm::fingerprint::{hash_canonical, SubtleDigest, Sha256Digest};
use widget_wasm::{
    BrowserSignals, FingerprintConfig, FingerprintEngine, JsCallbacks, KeyValueStore, LocalStorageStore,
    MemoryStore, SignalSource, StreamHandler,
};

wasm_bindgen_test_configure!(run_in_browser);

// ===== Probe Tests =====

#[wasm_bindgen_test]
fn navigator_probe_matches_page() {
    let signals = BrowserSignals::default().navigator().expect("navigator probe");
    let ua = js_sys::eval("navigator.userAgent").unwrap().as_string().unwrap();
    assert_eq!(signals.user_agent, ua);
    assert!(!signals.languages.is_empty(), "browsers report at least one language");
}

#[wasm_bindgen_test]
fn screen_probe_nonzero() {
    let screen = BrowserSignals::default().screen().expect("screen probe");
    assert!(screen.width > 0 && screen.height > 0);
}

#[wasm_bindgen_test]
fn canvas_signature_is_truncated() {
    let canvas = BrowserSignals::default().canvas().expect("canvas probe");
    assert_eq!(canvas.chars().count(), 50);
}

#[wasm_bindgen_test]
fn canvas_signature_is_stable() {
    let signals = BrowserSignals::default();
    assert_eq!(signals.canvas().unwrap(), signals.canvas().unwrap());
}

#[wasm_bindgen_test]
fn webgl_probe_format() {
    let webgl = BrowserSignals::default().webgl().expect("webgl probe never throws");
    assert!(webgl.is_empty() || webgl == NO_DEBUG_INFO || webgl.contains('~'));
}

#[wasm_bindgen_test]
fn fonts_follow_candidate_order() {
    let fonts = BrowserSignals::default().fonts().expect("font probe");
    let positions: Vec<usize> = fonts
        .iter()
        .map(|f| FONT_CANDIDATES.iter().position(|c| *c == f.as_str()).expect("only candidates reported"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[wasm_bindgen_test]
fn font_detection_with_constant_widths() {
    // A renderer where every family measures the same detects nothing
    assert!(detect_fonts(|_| Ok(100.0)).unwrap().is_empty());
}

#[wasm_bindgen_test]
fn storage_probe_cleans_up() {
    let storage = BrowserSignals::default().storage().expect("storage probe");
    assert!(storage.local_storage);
    let leftover = js_sys::eval("localStorage.getItem('__widget_storage_probe__')").unwrap();
    assert!(leftover.is_null());
}

// ===== Digest Tests =====

#[wasm_bindgen_test]
async fn subtle_digest_matches_rust_sha256() {
    let input = r#"{"userAgent":"test"}"#;
    let web = hash_canonical(&SubtleDigest, input).await;
    let native = hash_canonical(&Sha256Digest, input).await;
    assert_eq!(web, native);
}

// ===== Engine Tests =====

#[wasm_bindgen_test]
async fn browser_engine_caches_in_local_storage() {
    let config = FingerprintConfig {
        storage_key: "widget_fingerprint_test".into(),
        ..FingerprintConfig::default()
    };
    let engine = FingerprintEngine::browser(&config);
    engine.invalidate().unwrap();

    let fp = engine.generate().await;
    assert_eq!(fp.len(), 64);

    let store = LocalStorageStore::new().unwrap();
    let raw = store.get("widget_fingerprint_test").unwrap().expect("cached entry");
    assert!(raw.contains(&fp));

    assert_eq!(engine.generate().await, fp);
    engine.invalidate().unwrap();
    assert_eq!(store.get("widget_fingerprint_test").unwrap(), None);
}

#[wasm_bindgen_test]
async fn memory_store_engine_in_browser() {
    let store = Rc::new(MemoryStore::new());
    let engine = FingerprintEngine::new(&FingerprintConfig::default(), Rc::clone(&store), BrowserSignals::default());
    let fp = engine.generate().await;
    assert_eq!(store.len(), 1);
    assert_eq!(engine.cached(), Some(fp));
}

// ===== Callback Tests =====

#[wasm_bindgen_test]
fn js_callbacks_require_core_functions() {
    let callbacks = Object::new();
    Reflect::set(&callbacks, &JsValue::from_str("onToken"), &js_sys::Function::new_no_args("")).unwrap();
    assert!(JsCallbacks::from_object(&callbacks.into()).is_err());
}

#[wasm_bindgen_test]
fn js_callbacks_receive_events() {
    let calls = Array::new();
    let global = js_sys::global();
    Reflect::set(&global, &JsValue::from_str("__widgetCalls"), &calls).unwrap();

    let callbacks = js_sys::eval(
        "({ onToken: t => __widgetCalls.push('token:' + t), \
            onSources: s => __widgetCalls.push('sources:' + s.length), \
            onComplete: () => __widgetCalls.push('complete'), \
            onError: m => __widgetCalls.push('error:' + m) })",
    )
    .unwrap();

    let mut handler = JsCallbacks::from_object(&callbacks).unwrap();
    handler.on_token("hola");
    handler.on_sources(&serde_json::json!([{"title": "FAQ"}, {"title": "Envíos"}]));
    handler.on_thinking("ignored without onThinking");
    handler.on_complete();

    let recorded: Vec<String> = calls.iter().filter_map(|v| v.as_string()).collect();
    assert_eq!(recorded, vec!["token:hola", "sources:2", "complete"]);
}
