//! HTTP handler for the prediction form

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use serde::Deserialize;
use shared::{PredictionReport, PredictionRequest};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Raw form fields; year and area stay strings until parsed so that a bad
/// value is reported in the payload rather than rejected by the extractor
#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub crop: String,
    pub year: Option<String>,
    pub area: Option<String>,
}

/// Predict yield, revenue, alternatives, and explanations for one crop
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> AppResult<Json<PredictionReport>> {
    let Form(form) = form.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let request = PredictionRequest::parse(
        &form.district,
        &form.crop,
        form.year.as_deref(),
        form.area.as_deref(),
    )?;
    let report = state.service.advise(request).await?;
    Ok(Json(report))
}
