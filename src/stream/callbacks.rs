//! `StreamHandler` backed by JS callback functions.

use super::StreamHandler;
use crate::error::{js_message, Result, WidgetError};
use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Callbacks read from an object like
/// `{ onToken, onSources, onThinking?, onFinalResponse?, onComplete, onError }`.
pub struct JsCallbacks {
    on_token: Function,
    on_sources: Function,
    on_thinking: Option<Function>,
    on_final_response: Option<Function>,
    on_complete: Function,
    on_error: Function,
}

impl JsCallbacks {
    pub fn from_object(callbacks: &JsValue) -> Result<Self> {
        Ok(Self {
            on_token: required(callbacks, "onToken")?,
            on_sources: required(callbacks, "onSources")?,
            on_thinking: optional(callbacks, "onThinking"),
            on_final_response: optional(callbacks, "onFinalResponse"),
            on_complete: required(callbacks, "onComplete")?,
            on_error: required(callbacks, "onError")?,
        })
    }

    fn call(name: &str, func: &Function, arg: &JsValue) {
        if let Err(e) = func.call1(&JsValue::NULL, arg) {
            log::warn!("{} callback threw: {}", name, js_message(&e));
        }
    }
}

fn optional(callbacks: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(callbacks, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

fn required(callbacks: &JsValue, name: &str) -> Result<Function> {
    optional(callbacks, name).ok_or_else(|| WidgetError::Config(format!("missing callback {}", name)))
}

impl StreamHandler for JsCallbacks {
    fn on_token(&mut self, content: &str) {
        Self::call("onToken", &self.on_token, &JsValue::from_str(content));
    }

    fn on_sources(&mut self, sources: &Value) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        match sources.serialize(&serializer) {
            Ok(value) => Self::call("onSources", &self.on_sources, &value),
            Err(e) => log::warn!("Could not convert sources for onSources: {}", e),
        }
    }

    fn on_thinking(&mut self, content: &str) {
        if let Some(f) = &self.on_thinking {
            Self::call("onThinking", f, &JsValue::from_str(content));
        }
    }

    fn on_final_response(&mut self, content: &str) {
        if let Some(f) = &self.on_final_response {
            Self::call("onFinalResponse", f, &JsValue::from_str(content));
        }
    }

    fn on_complete(&mut self) {
        if let Err(e) = self.on_complete.call0(&JsValue::NULL) {
            log::warn!("onComplete callback threw: {}", js_message(&e));
        }
    }

    fn on_error(&mut self, message: &str) {
        Self::call("onError", &self.on_error, &JsValue::from_str(message));
    }
}
