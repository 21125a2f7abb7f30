//! Crop economics table endpoint

use axum::Json;
use shared::{CropRecord, CROP_TABLE};

/// List every crop with its MSP and water requirement
pub async fn list_crops() -> Json<&'static [CropRecord]> {
    Json(CROP_TABLE)
}
