//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint. The client
//! itself reports failures as [`AppError::ExternalService`]; the
//! [`WeatherProvider`] implementation turns every failure into the fixed
//! fallback observation so the prediction path never fails on weather.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::{round_to, ObservationSource, WeatherObservation};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Source of weather observations for the advisory path
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Observation for `location`. Never fails: any error yields
    /// [`WeatherObservation::fallback`].
    async fn fetch(&self, location: &str, year: Option<i32>) -> WeatherObservation;
}

/// OpenWeatherMap client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    country_code: String,
    timeout: Duration,
}

/// OpenWeatherMap API response for current weather, reduced to the fields
/// the model uses
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    main: Option<OWMMain>,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct OWMRain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hour: Option<f64>,
}

impl OpenWeatherClient {
    /// Create a client from the weather configuration section
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            country_code: config.country_code.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            country_code: "IN".to_string(),
            timeout,
        }
    }

    /// Fetch current conditions for a named location
    pub async fn fetch_current(&self, location: &str) -> AppResult<WeatherObservation> {
        let url = format!("{}/weather", self.base_url);
        let query = format!("{},{}", location, self.country_code);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        // Only a plain 200 carries an observation
        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        convert_current_response(data)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, location: &str, _year: Option<i32>) -> WeatherObservation {
        match self.fetch_current(location).await {
            Ok(observation) => observation,
            Err(e) => {
                tracing::warn!(location, error = %e, "Weather unavailable, using fallback");
                WeatherObservation::fallback()
            }
        }
    }
}

/// Convert an OpenWeatherMap current response to an observation
fn convert_current_response(data: OWMCurrentResponse) -> AppResult<WeatherObservation> {
    let main = data
        .main
        .ok_or_else(|| AppError::ExternalService("Weather response has no 'main' block".into()))?;

    Ok(WeatherObservation {
        temp_avg: round_to((main.temp + main.feels_like) / 2.0, 2),
        temp_max: main.temp_max,
        temp_min: main.temp_min,
        humidity: main.humidity,
        rainfall: extract_rainfall(data.rain.as_ref()),
        source: ObservationSource::OpenWeather,
    })
}

/// Prefer the 1-hour figure, then the 3-hour figure, else no rain
pub fn extract_rainfall(rain: Option<&OWMRain>) -> f64 {
    rain.and_then(|r| r.one_hour.or(r.three_hour))
        .unwrap_or(0.0)
}
