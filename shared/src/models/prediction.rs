//! Prediction, recommendation, and explanation records

use serde::{Deserialize, Serialize};

use crate::models::{CropRecord, WeatherObservation};
use crate::types::round_to;
use crate::validation::{parse_area, parse_year, InputError};

/// Yield estimate with the economics derived from it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub yield_estimate: f64,
    pub revenue_estimate: f64,
    pub irrigation_needed: f64,
}

impl PredictionResult {
    /// Derive revenue and irrigation for `crop` from a yield estimate
    pub fn derive(crop: &CropRecord, yield_estimate: f64, rainfall_mm: f64) -> Self {
        Self {
            yield_estimate,
            revenue_estimate: crop.revenue(yield_estimate),
            irrigation_needed: crop.irrigation_needed(rainfall_mm),
        }
    }
}

/// An alternative crop ranked by projected revenue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationEntry {
    pub crop: String,
    #[serde(rename = "yield")]
    pub yield_estimate: f64,
    #[serde(rename = "revenue")]
    pub revenue_estimate: f64,
    #[serde(rename = "irrigation")]
    pub irrigation_needed: f64,
}

impl RecommendationEntry {
    pub fn new(crop: &CropRecord, result: PredictionResult) -> Self {
        Self {
            crop: crop.name.to_string(),
            yield_estimate: result.yield_estimate,
            revenue_estimate: result.revenue_estimate,
            irrigation_needed: result.irrigation_needed,
        }
    }

    /// Copy with figures rounded for reporting
    pub fn rounded(&self) -> Self {
        Self {
            crop: self.crop.clone(),
            yield_estimate: round_to(self.yield_estimate, 2),
            revenue_estimate: round_to(self.revenue_estimate, 2),
            irrigation_needed: round_to(self.irrigation_needed, 2),
        }
    }
}

/// Whether a feature pushed the prediction up or down
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increased,
    Reduced,
}

impl Direction {
    /// Strictly positive contributions increased the prediction; everything
    /// else, zero included, is reported as reduced.
    pub fn from_impact(impact: f64) -> Self {
        if impact > 0.0 {
            Direction::Increased
        } else {
            Direction::Reduced
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Increased => write!(f, "increased"),
            Direction::Reduced => write!(f, "reduced"),
        }
    }
}

/// Contribution of one transformed feature to a prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributionEntry {
    #[serde(rename = "feature")]
    pub feature_name: String,
    pub impact: f64,
    pub direction: Direction,
}

impl AttributionEntry {
    pub fn new(feature_name: impl Into<String>, impact: f64) -> Self {
        Self {
            feature_name: feature_name.into(),
            impact,
            direction: Direction::from_impact(impact),
        }
    }

    /// Copy with the impact rounded for reporting. The direction keeps the
    /// sign of the unrounded value.
    pub fn rounded(&self) -> Self {
        Self {
            feature_name: self.feature_name.clone(),
            impact: round_to(self.impact, 3),
            direction: self.direction,
        }
    }
}

/// Parsed inbound prediction request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    /// District as typed by the user
    pub district: String,
    /// Crop as typed by the user
    pub crop: String,
    pub year: i32,
    /// Cultivated area in hectares
    pub area: f64,
}

impl PredictionRequest {
    pub fn new(district: impl Into<String>, crop: impl Into<String>, year: i32, area: f64) -> Self {
        Self {
            district: district.into(),
            crop: crop.into(),
            year,
            area,
        }
    }

    /// Parse raw form fields; absent year and area take their defaults
    pub fn parse(
        district: &str,
        crop: &str,
        year: Option<&str>,
        area: Option<&str>,
    ) -> Result<Self, InputError> {
        Ok(Self::new(district, crop, parse_year(year)?, parse_area(area)?))
    }
}

/// Successful response of the prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionReport {
    pub district: String,
    pub crop: String,
    pub year: i32,
    pub area: f64,
    pub predicted_yield: f64,
    pub predicted_revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irrigation_needed: Option<f64>,
    pub weather: WeatherObservation,
    pub recommendations: Vec<RecommendationEntry>,
    pub explanations: Vec<AttributionEntry>,
}
