//! Advisory service: the full prediction flow for one request
//!
//! district check → weather → primary prediction → attribution →
//! crop economics → alternative crops → report. Rounding is applied only
//! when the report is built.

use std::sync::Arc;

use shared::{
    capitalize, find_crop, normalize_district, round_to, AreaUnits, FeatureRecord,
    PredictionReport, PredictionRequest, PredictionResult,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::PredictionConfig;
use crate::error::{AppError, AppResult};
use crate::external::WeatherProvider;
use crate::ml::{AttributionExplainer, Pipeline, YieldPredictor};
use crate::services::{DistrictValidator, Recommender};

/// Orchestrates a prediction request
pub struct AdvisoryService {
    districts: Arc<dyn DistrictValidator>,
    weather: Arc<dyn WeatherProvider>,
    predictor: YieldPredictor,
    explainer: AttributionExplainer,
    recommender: Recommender,
    area_units: AreaUnits,
}

impl AdvisoryService {
    pub fn new(
        pipeline: Arc<Pipeline>,
        districts: Arc<dyn DistrictValidator>,
        weather: Arc<dyn WeatherProvider>,
        settings: &PredictionConfig,
    ) -> Self {
        let predictor = YieldPredictor::new(pipeline.clone());
        Self {
            districts,
            weather,
            explainer: AttributionExplainer::new(pipeline, settings.explanation_count),
            recommender: Recommender::new(predictor.clone(), settings.recommendation_count),
            predictor,
            area_units: settings.area_units,
        }
    }

    /// Name of the loaded model artifact
    pub fn model_name(&self) -> &str {
        &self.predictor.pipeline().name
    }

    /// Run the full prediction flow under a request-scoped span
    pub async fn advise(&self, request: PredictionRequest) -> AppResult<PredictionReport> {
        let span = tracing::info_span!(
            "advise",
            request_id = %Uuid::new_v4(),
            district = %request.district,
            crop = %request.crop,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: PredictionRequest) -> AppResult<PredictionReport> {
        let district = normalize_district(&request.district);
        if !self.districts.is_valid(&district) {
            return Err(AppError::invalid_district());
        }

        let weather = self.weather.fetch(&district, Some(request.year)).await;
        if weather.is_fallback() {
            tracing::debug!("Predicting with fallback weather");
        }

        let area = self.area_units.primary_area(request.area);
        let record = FeatureRecord::assemble(&district, request.year, area, &request.crop, &weather);
        let predicted_yield = self.predictor.predict(&record)?;
        let explanations = self.explainer.explain(&record)?;

        let (predicted_revenue, irrigation_needed) = match find_crop(&request.crop) {
            Some(crop) => {
                let result = PredictionResult::derive(crop, predicted_yield, weather.rainfall);
                (result.revenue_estimate, Some(result.irrigation_needed))
            }
            None => {
                tracing::debug!("Crop not in economics table, revenue reported as 0");
                (0.0, None)
            }
        };

        let recommendations = self.recommender.recommend(
            &district,
            request.year,
            request.area,
            &weather,
            &request.crop,
        )?;

        tracing::info!(
            predicted_yield,
            predicted_revenue,
            weather_source = ?weather.source,
            "Prediction complete"
        );

        Ok(PredictionReport {
            district: capitalize(request.district.trim()),
            crop: capitalize(request.crop.trim()),
            year: request.year,
            area: request.area,
            predicted_yield: round_to(predicted_yield, 2),
            predicted_revenue: round_to(predicted_revenue, 2),
            irrigation_needed: irrigation_needed.map(|value| round_to(value, 2)),
            weather,
            recommendations: recommendations.iter().map(|entry| entry.rounded()).collect(),
            explanations: explanations.iter().map(|entry| entry.rounded()).collect(),
        })
    }
}
