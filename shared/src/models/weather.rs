//! Weather observation models

use serde::{Deserialize, Serialize};

/// Where a weather observation came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSource {
    /// Live conditions from OpenWeatherMap
    OpenWeather,
    /// Fixed climatological defaults used when the live source is unavailable
    Fallback,
}

/// Normalized weather observation used as model input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherObservation {
    /// Mean of reported and feels-like temperature, °C
    pub temp_avg: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Rainfall, mm
    pub rainfall: f64,
    pub source: ObservationSource,
}

impl WeatherObservation {
    /// The observation served whenever the weather source fails
    pub const FALLBACK: WeatherObservation = WeatherObservation {
        temp_avg: 28.0,
        temp_max: 35.0,
        temp_min: 20.0,
        humidity: 60.0,
        rainfall: 120.0,
        source: ObservationSource::Fallback,
    };

    pub fn fallback() -> Self {
        Self::FALLBACK
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ObservationSource::Fallback
    }
}
