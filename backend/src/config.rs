//! Configuration management for the Crop Yield Advisor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CROP__ prefix (e.g. CROP__SERVER__PORT)

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::AreaUnits;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Trained pipeline artifact
    pub model: ModelConfig,

    /// Known-district table
    pub districts: DistrictsConfig,

    /// Prediction behaviour
    pub prediction: PredictionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,

    /// Country code appended to the location query
    pub country_code: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Path to the JSON model artifact
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DistrictsConfig {
    /// Path to the district coordinate CSV
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Number of alternative crops returned
    pub recommendation_count: usize,

    /// Number of attribution entries returned
    pub explanation_count: usize,

    /// Area handling on the primary prediction path
    pub area_units: AreaUnits,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = with_defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP__ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configuration made of the built-in defaults only
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults(config::Config::builder(), "development")?
            .build()?
            .try_deserialize()
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    environment: &str,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    builder
        .set_default("environment", environment)?
        .set_default("server.port", 5000)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
        .set_default("weather.api_key", "")?
        .set_default("weather.country_code", "IN")?
        .set_default("weather.timeout_secs", 5)?
        .set_default("model.path", "model/yield_prediction_model.json")?
        .set_default("districts.path", "dataset/up_lat_long.csv")?
        .set_default("prediction.recommendation_count", 3)?
        .set_default("prediction.explanation_count", 3)?
        .set_default("prediction.area_units", "consistent")
}
