//! WebAssembly module for the Crop Yield Advisor
//!
//! Provides client-side helpers for the prediction form:
//! - Crop catalog for the crop picker
//! - Revenue and irrigation estimates from the economics table
//! - Form validation matching the server's parsing rules

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Crop table as a JSON array of `{name, msp_per_quintal, water_req_mm}`
#[wasm_bindgen]
pub fn crop_catalog_json() -> Result<String, JsValue> {
    serde_json::to_string(CROP_TABLE)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize crop table: {}", e)))
}

/// Revenue for a yield estimate, rounded to 2 decimals; None for unknown crops
#[wasm_bindgen]
pub fn estimate_revenue(crop: &str, yield_estimate: f64) -> Option<f64> {
    find_crop(crop).map(|record| round_to(record.revenue(yield_estimate), 2))
}

/// Irrigation still needed after rainfall (mm); None for unknown crops
#[wasm_bindgen]
pub fn estimate_irrigation(crop: &str, rainfall_mm: f64) -> Option<f64> {
    find_crop(crop).map(|record| round_to(record.irrigation_needed(rainfall_mm), 2))
}

/// Display form of a district or crop name
#[wasm_bindgen]
pub fn display_name(value: &str) -> String {
    capitalize(value.trim())
}

#[derive(Serialize)]
struct ParsedInputs {
    year: i32,
    area: f64,
}

/// Parse the optional year and area form fields the way the server does.
///
/// Empty inputs take the defaults. Returns `{"year": .., "area": ..}` as
/// JSON, or the server's error message.
#[wasm_bindgen]
pub fn validate_prediction_inputs(year: &str, area: &str) -> Result<String, JsValue> {
    let parsed = ParsedInputs {
        year: parse_year(Some(year)).map_err(|e| JsValue::from_str(&e.to_string()))?,
        area: parse_area(Some(area)).map_err(|e| JsValue::from_str(&e.to_string()))?,
    };
    serde_json::to_string(&parsed).map_err(|e| JsValue::from_str(&e.to_string()))
}
