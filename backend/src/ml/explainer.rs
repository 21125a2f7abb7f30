//! Per-prediction feature attribution
//!
//! Attributions are computed on the transformed feature space, so a one-hot
//! column such as `cat__Crop_WHEAT` is reported on its own.

use std::sync::Arc;

use shared::{AttributionEntry, FeatureRecord};

use super::pipeline::Pipeline;
use super::shap::ShapValues;
use super::ModelError;

/// Explains individual predictions of a pipeline
#[derive(Debug, Clone)]
pub struct AttributionExplainer {
    pipeline: Arc<Pipeline>,
    feature_names: Vec<String>,
    top_k: usize,
}

impl AttributionExplainer {
    pub fn new(pipeline: Arc<Pipeline>, top_k: usize) -> Self {
        let feature_names = pipeline.feature_names();
        Self {
            pipeline,
            feature_names,
            top_k,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Raw attributions for every transformed feature
    pub fn attributions(&self, record: &FeatureRecord) -> Result<ShapValues, ModelError> {
        let features = self.pipeline.transform(record)?;
        Ok(ShapValues::compute(&self.pipeline.regressor, &features))
    }

    /// The `top_k` strongest contributions, largest magnitude first.
    ///
    /// Equal magnitudes keep feature order. Impacts are unrounded.
    pub fn explain(&self, record: &FeatureRecord) -> Result<Vec<AttributionEntry>, ModelError> {
        let shap = self.attributions(record)?;

        let mut ranked: Vec<(usize, f64)> = shap.values.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

        Ok(ranked
            .into_iter()
            .take(self.top_k)
            .map(|(idx, impact)| AttributionEntry::new(self.feature_names[idx].clone(), impact))
            .collect())
    }
}
