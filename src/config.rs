//! Application Configuration
//!
//! Defaults baked in at compile time, optionally overridden by a JSON object
//! (or a JSON string) the host page assigns to `window.__APP_CONFIG__` before
//! the bundle loads.

use serde::Deserialize;
use wasm_bindgen::JsValue;

/// Layout constants for the process graph
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub margin_x: f64,
    pub level_width: f64,
    pub node_spacing: f64,
    pub node_width: f64,
    pub node_height: f64,
    /// Extra room around the laid-out nodes when panning
    pub pan_padding: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1043.0,
            canvas_height: 200.0,
            margin_x: 40.0,
            level_width: 250.0,
            node_spacing: 60.0,
            node_width: 120.0,
            node_height: 50.0,
            pan_padding: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for every REST call
    pub api_base: String,
    pub toast_duration_ms: u32,
    /// Max toasts on screen at once
    pub toast_limit: usize,
    pub log_level: String,
    pub log_buffer_lines: usize,
    pub graph: GraphConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            toast_duration_ms: 3000,
            toast_limit: 1,
            log_level: "info".to_string(),
            log_buffer_lines: console_logger::DEFAULT_CAPACITY,
            graph: GraphConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `window.__APP_CONFIG__`, falling back to defaults if absent or malformed
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let raw = js_sys::Reflect::get(&window, &JsValue::from_str("__APP_CONFIG__")).unwrap_or(JsValue::UNDEFINED);
        if raw.is_undefined() || raw.is_null() {
            return Self::default();
        }
        if let Some(text) = raw.as_string() {
            return Self::from_json(&text).unwrap_or_default();
        }
        serde_wasm_bindgen::from_value::<AppConfig>(raw)
            .map(AppConfig::normalized)
            .unwrap_or_default()
    }

    /// Parse an override given as JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<AppConfig>(json).map(AppConfig::normalized)
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base.trim_end_matches('/');
        self.api_base = if trimmed.is_empty() { "/api".to_string() } else { trimmed.to_string() };
        self.toast_limit = self.toast_limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg = AppConfig::from_json(r#"{"api_base":"/backend/api/","graph":{"level_width":300}}"#).unwrap();
        assert_eq!(cfg.api_base, "/backend/api");
        assert_eq!(cfg.graph.level_width, 300.0);
        assert_eq!(cfg.graph.node_spacing, 60.0);
        assert_eq!(cfg.toast_duration_ms, 3000);
    }

    #[test]
    fn test_degenerate_values_are_normalized() {
        let cfg = AppConfig::from_json(r#"{"api_base":"/","toast_limit":0}"#).unwrap();
        assert_eq!(cfg.api_base, "/api");
        assert_eq!(cfg.toast_limit, 1);
    }

    #[test]
    fn test_text_override_falls_back_when_malformed() {
        assert_eq!(AppConfig::from_json("{not json").unwrap_or_default(), AppConfig::default());
        let cfg = AppConfig::from_json(r#"{"log_level":"debug"}"#).unwrap_or_default();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.api_base, "/api");
    }
}
