//! Common types used across the platform

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default year used when a request does not provide one
pub const DEFAULT_YEAR: i32 = 2025;

/// Default cultivated area (hectares) used when a request does not provide one
pub const DEFAULT_AREA_HA: f64 = 1.0;

/// Hectares per unit of the model's `Area (1000 ha)` column
pub const HECTARES_PER_AREA_UNIT: f64 = 1000.0;

/// How the primary prediction path treats the requested area.
///
/// The recommendation path always converts hectares to thousand-hectare
/// units. `Legacy` keeps the primary path passing the area through verbatim,
/// which reproduces outputs of the earlier deployment bit for bit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnits {
    #[default]
    Consistent,
    Legacy,
}

impl AreaUnits {
    /// Area value fed to the model for the requested crop
    pub fn primary_area(&self, area: f64) -> f64 {
        match self {
            AreaUnits::Consistent => hectares_to_model_units(area),
            AreaUnits::Legacy => area,
        }
    }

    /// Area value fed to the model for every alternative crop
    pub fn recommendation_area(&self, area: f64) -> f64 {
        hectares_to_model_units(area)
    }
}

/// Convert hectares to the thousand-hectare units the model was fit on
pub fn hectares_to_model_units(area_ha: f64) -> f64 {
    area_ha / HECTARES_PER_AREA_UNIT
}

/// Round to `dp` decimal places using banker's rounding on the exact binary
/// value, matching how the reported figures have always been rounded.
///
/// Non-finite values are returned unchanged.
pub fn round_to(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or(value)
}
