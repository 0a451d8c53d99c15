//! WASM bindings for browser-based conversion.
//!
//! This module exposes the converter to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::TurndownService;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert HTML to Markdown with the default options.
#[wasm_bindgen]
pub fn turndown(html: &str) -> Result<String, JsValue> {
    TurndownService::new()
        .render(html)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert HTML to Markdown with options given as a JSON object string.
///
/// Keys follow the camelCase option names, e.g. `{"headingStyle": "atx"}`.
#[wasm_bindgen]
pub fn turndown_with_settings(html: &str, settings: &str) -> Result<String, JsValue> {
    let options = Settings::from_json(settings)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .into_options();
    let service =
        TurndownService::with_options(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    service
        .render(html)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
