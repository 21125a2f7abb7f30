//! Error handling for the Crop Yield Advisor
//!
//! Domain failures never change the transport status. Every error becomes a
//! `200 OK` with an `{"error": "..."}` body, the contract the browser client
//! has always relied on.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::InputError;
use thiserror::Error;

use crate::ml::ModelError;

/// Message returned when the district is not in the registry
pub const INVALID_DISTRICT_MESSAGE: &str = "Enter a valid district";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad request parameters; processing stops before any external call
    #[error("{0}")]
    InvalidInput(String),

    /// Weather source unreachable or malformed; recovered by the fallback
    /// observation and only ever logged
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Anything else failing during assembly, prediction, or explanation
    #[error("{0}")]
    Unexpected(String),

    /// Startup configuration, model artifact, or district table problems
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn invalid_district() -> Self {
        AppError::InvalidInput(INVALID_DISTRICT_MESSAGE.to_string())
    }

    /// Short machine-readable code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::Unexpected(_) => "UNEXPECTED_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidInput(_) => {
                tracing::info!(code = self.code(), "Rejected request: {}", self)
            }
            _ => tracing::error!(code = self.code(), "Error: {:?}", self),
        }

        (
            StatusCode::OK,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
