//! Alternative-crop recommendation engine
//!
//! Every crop in the economics table except the requested one is scored
//! with the same weather observation, then ranked by projected revenue.

use shared::{
    hectares_to_model_units, round_to, FeatureRecord, PredictionResult, RecommendationEntry,
    WeatherObservation, CROP_TABLE,
};

use crate::ml::{ModelError, YieldPredictor};

/// Ranks alternative crops by projected revenue
#[derive(Debug, Clone)]
pub struct Recommender {
    predictor: YieldPredictor,
    count: usize,
}

impl Recommender {
    pub fn new(predictor: YieldPredictor, count: usize) -> Self {
        Self { predictor, count }
    }

    /// Top crops by revenue, excluding `excluded_crop` (case-insensitive).
    ///
    /// `area_ha` is in hectares and converted to model units for every
    /// candidate. Ordering uses revenue as reported (2 decimal places); the
    /// sort is stable so revenues that report equal keep table order.
    pub fn recommend(
        &self,
        district: &str,
        year: i32,
        area_ha: f64,
        weather: &WeatherObservation,
        excluded_crop: &str,
    ) -> Result<Vec<RecommendationEntry>, ModelError> {
        let area = hectares_to_model_units(area_ha);

        let mut candidates = CROP_TABLE
            .iter()
            .filter(|crop| !crop.matches(excluded_crop))
            .map(|crop| {
                let record = FeatureRecord::assemble(district, year, area, crop.name, weather);
                let yield_estimate = self.predictor.predict(&record)?;
                let result = PredictionResult::derive(crop, yield_estimate, weather.rainfall);
                Ok(RecommendationEntry::new(crop, result))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        candidates.sort_by(|a, b| {
            round_to(b.revenue_estimate, 2).total_cmp(&round_to(a.revenue_estimate, 2))
        });
        candidates.truncate(self.count);

        tracing::debug!(
            district,
            excluded = excluded_crop,
            returned = candidates.len(),
            "Ranked alternative crops"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ml::Pipeline;

    /// Yield does not depend on any input
    fn constant_predictor(value: f64) -> YieldPredictor {
        let json = format!(
            r#"{{
                "preprocessor": {{"transformers": [
                    {{"kind": "passthrough", "name": "num", "columns": ["Year"]}}
                ]}},
                "regressor": {{"trees": [{{"nodes": [{{"value": {}, "cover": 1}}]}}]}}
            }}"#,
            value
        );
        YieldPredictor::new(Arc::new(Pipeline::from_json(&json).unwrap()))
    }

    #[test]
    fn test_constant_yield_ranks_by_msp() {
        let recommender = Recommender::new(constant_predictor(1000.0), 3);
        let entries = recommender
            .recommend("Lucknow", 2024, 2.0, &WeatherObservation::fallback(), "Wheat")
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.crop.as_str()).collect();
        assert_eq!(names, vec!["Sesamum", "Pigeonpea", "Castor"]);
        assert_eq!(entries[0].revenue_estimate, 92670.0);
        // Fallback rainfall 120 against Sesamum's 400 mm
        assert_eq!(entries[0].irrigation_needed, 280.0);
    }

    #[test]
    fn test_excluded_crop_is_case_insensitive() {
        let recommender = Recommender::new(constant_predictor(1000.0), 3);
        let entries = recommender
            .recommend("Lucknow", 2024, 2.0, &WeatherObservation::fallback(), "  sesamum ")
            .unwrap();
        assert!(entries.iter().all(|e| e.crop != "Sesamum"));
        assert_eq!(entries[0].crop, "Pigeonpea");
    }

    #[test]
    fn test_revenues_equal_at_two_places_keep_table_order() {
        // Cotton 0.07121, Groundnut 0.06783 and Sunflower 0.0728 all report 0.07
        let recommender = Recommender::new(constant_predictor(0.001), 5);
        let entries = recommender
            .recommend("Lucknow", 2024, 2.0, &WeatherObservation::fallback(), "Sesamum")
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.crop.as_str()).collect();
        assert_eq!(
            names,
            vec!["Pigeonpea", "Castor", "Cotton", "Groundnut", "Sunflower"]
        );
        assert!(entries[4].revenue_estimate > entries[2].revenue_estimate);
    }

    #[test]
    fn test_count_is_configurable() {
        let recommender = Recommender::new(constant_predictor(10.0), 30);
        let entries = recommender
            .recommend("Agra", 2025, 1.0, &WeatherObservation::fallback(), "Rice")
            .unwrap();
        assert_eq!(entries.len(), CROP_TABLE.len() - 1);
    }
}
