//! Name normalization and input validation for the Crop Yield Advisor
//!
//! All casing rules live here so that the district registry, the feature
//! assembler, the crop table, and the response builder cannot drift apart.

use thiserror::Error;

use crate::types::{DEFAULT_AREA_HA, DEFAULT_YEAR};

/// Rejected request input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid year '{0}': expected a whole number")]
    InvalidYear(String),

    #[error("Invalid area '{0}': expected a finite number")]
    InvalidArea(String),
}

// ============================================================================
// Name Normalization
// ============================================================================

/// District names are matched and fed to the model in lowercase
pub fn normalize_district(district: &str) -> String {
    district.trim().to_lowercase()
}

/// Crop names are fed to the model in uppercase
pub fn normalize_crop(crop: &str) -> String {
    crop.trim().to_uppercase()
}

/// Uppercase the first character and lowercase the rest, for display
///
/// `"kanpur NAGAR"` becomes `"Kanpur nagar"`.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Request Parsing
// ============================================================================

/// A form field that was left empty counts as not submitted
fn submitted(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Parse the optional year field; absent or blank means [`DEFAULT_YEAR`]
pub fn parse_year(raw: Option<&str>) -> Result<i32, InputError> {
    match submitted(raw) {
        None => Ok(DEFAULT_YEAR),
        Some(value) => value
            .trim()
            .parse::<i32>()
            .map_err(|_| InputError::InvalidYear(value.to_string())),
    }
}

/// Parse the optional area field (hectares); absent or blank means
/// [`DEFAULT_AREA_HA`]
pub fn parse_area(raw: Option<&str>) -> Result<f64, InputError> {
    match submitted(raw) {
        None => Ok(DEFAULT_AREA_HA),
        Some(value) => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|area| area.is_finite())
            .ok_or_else(|| InputError::InvalidArea(value.to_string())),
    }
}
