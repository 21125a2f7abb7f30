//! Route definitions for the Crop Yield Advisor

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Form endpoint served to the browser client
pub fn form_routes() -> Router<AppState> {
    Router::new().route("/predict", post(handlers::predict))
}

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/crops", get(handlers::list_crops))
}
