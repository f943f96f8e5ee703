//! Error types for the widget client
//!
//! This module provides the error taxonomy shared by both components:
//! - Detailed variants for storage, probe, digest and transport failures
//! - Error codes for programmatic handling
//! - Retry classification (the crate itself never retries)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, WidgetError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Fingerprint errors (1xx)
    ProbeFailed = 100,
    DigestUnavailable = 101,

    // Storage errors (2xx)
    StorageError = 200,
    SerializationError = 201,

    // Transport errors (3xx)
    TransportFailed = 300,
    HttpStatus = 301,
    MissingBody = 302,

    // Configuration errors (8xx)
    ConfigError = 800,

    // Internal errors (9xx)
    JsError = 900,
}

/// Main error type for the widget client
#[derive(Error, Debug, Clone)]
pub enum WidgetError {
    // ===== Fingerprint Errors =====
    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Digest unavailable: {0}")]
    Digest(String),

    // ===== Storage Errors =====
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ===== Transport Errors =====
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("No response body")]
    MissingBody,

    // ===== Configuration Errors =====
    #[error("Invalid config: {0}")]
    Config(String),

    // ===== Internal Errors =====
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl WidgetError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            WidgetError::Probe(_) => ErrorCode::ProbeFailed,
            WidgetError::Digest(_) => ErrorCode::DigestUnavailable,
            WidgetError::Storage(_) => ErrorCode::StorageError,
            WidgetError::Serialization(_) => ErrorCode::SerializationError,
            WidgetError::Transport(_) => ErrorCode::TransportFailed,
            WidgetError::HttpStatus { .. } => ErrorCode::HttpStatus,
            WidgetError::MissingBody => ErrorCode::MissingBody,
            WidgetError::Config(_) => ErrorCode::ConfigError,
            WidgetError::Js(_) => ErrorCode::JsError,
        }
    }

    /// Whether the caller could reasonably retry the operation.
    ///
    /// Server errors (5xx) and network failures are transient; client errors
    /// and missing bodies are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            WidgetError::Transport(_) => true,
            WidgetError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Convert a thrown JS value into a `WidgetError`, keeping its message.
    pub fn from_js(value: &JsValue) -> Self {
        WidgetError::Js(js_message(value))
    }
}

/// Best-effort human readable message for a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        WidgetError::Serialization(err.to_string())
    }
}

impl From<WidgetError> for JsValue {
    fn from(err: WidgetError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Error information for JavaScript consumption
#[derive(Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u32,
    pub message: String,
    pub is_retryable: bool,
}

impl From<&WidgetError> for ErrorInfo {
    fn from(err: &WidgetError) -> Self {
        ErrorInfo {
            code: err.code() as u32,
            message: err.to_string(),
            is_retryable: err.is_retryable(),
        }
    }
}
