//! The flat record of signals a fingerprint is derived from.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Weakly identifying device/browser signals.
///
/// Field order is the canonical order: `canonical()` serializes the struct,
/// never a map, so the string is identical run to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintComponents {
    pub user_agent: String,
    pub language: String,
    pub languages: Vec<String>,
    pub platform: String,
    pub hardware_concurrency: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_memory: Option<f64>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub screen_depth: u32,
    pub timezone_offset: i32,
    pub timezone: String,
    pub session_storage: bool,
    pub local_storage: bool,
    #[serde(rename = "indexedDB")]
    pub indexed_db: bool,
    pub cookie_enabled: bool,
    pub canvas: String,
    pub webgl: String,
    pub fonts: Vec<String>,
}

impl FingerprintComponents {
    /// Compact JSON in declaration order.
    pub fn canonical(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FingerprintComponents {
        FingerprintComponents {
            user_agent: "Mozilla/5.0".into(),
            language: "es-ES".into(),
            languages: vec!["es-ES".into(), "en".into()],
            platform: "Linux x86_64".into(),
            hardware_concurrency: 8,
            device_memory: Some(8.0),
            screen_width: 1920,
            screen_height: 1080,
            screen_depth: 24,
            timezone_offset: -60,
            timezone: "Europe/Madrid".into(),
            session_storage: true,
            local_storage: true,
            indexed_db: true,
            cookie_enabled: true,
            canvas: "AAAASUVORK5CYII=".into(),
            webgl: "Google Inc.~ANGLE".into(),
            fonts: vec!["Arial".into(), "Verdana".into()],
        }
    }

    #[test]
    fn test_canonical_field_order() {
        let canonical = sample().canonical().unwrap();
        assert!(canonical.starts_with(r#"{"userAgent":"Mozilla/5.0","language":"es-ES","languages":["es-ES","en"]"#));
        assert!(canonical.contains(r#""deviceMemory":8.0"#));
        assert!(canonical.contains(r#""indexedDB":true"#));
        assert!(canonical.ends_with(r#""fonts":["Arial","Verdana"]}"#));
    }

    #[test]
    fn test_canonical_is_stable() {
        let a = sample().canonical().unwrap();
        let b = sample().clone().canonical().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_device_memory_is_omitted() {
        let mut components = sample();
        components.device_memory = None;
        let canonical = components.canonical().unwrap();
        assert!(!canonical.contains("deviceMemory"));
    }

    #[test]
    fn test_default_is_all_fallbacks() {
        let components = FingerprintComponents::default();
        assert_eq!(components.user_agent, "");
        assert_eq!(components.hardware_concurrency, 0);
        assert!(components.device_memory.is_none());
        assert!(!components.local_storage);
        assert!(components.fonts.is_empty());
    }
}
