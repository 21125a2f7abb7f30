//! Trained yield pipeline: preprocessing followed by a tree ensemble
//!
//! The artifact is a single JSON document:
//!
//! ```json
//! {
//!   "name": "crop-yield-gbr",
//!   "preprocessor": { "transformers": [ { "kind": "standard_scaler", ... } ] },
//!   "regressor": { "base_score": 0.0, "aggregation": "sum", "trees": [ ... ] }
//! }
//! ```
//!
//! It is loaded and validated once at startup and shared read-only between
//! requests.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::FeatureRecord;

use super::preprocess::Preprocessor;
use super::tree::TreeEnsemble;
use super::ModelError;

fn default_name() -> String {
    "yield-model".to_string()
}

/// Complete prediction pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    #[serde(default = "default_name")]
    pub name: String,
    pub preprocessor: Preprocessor,
    pub regressor: TreeEnsemble,
}

impl Pipeline {
    /// Parse and validate an artifact
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let pipeline: Pipeline = serde_json::from_str(json)?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Read, parse, and validate an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.preprocessor.validate()?;
        self.regressor.validate(self.preprocessor.output_width())
    }

    /// Transformed feature names, index-aligned with [`Self::transform`]
    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.feature_names()
    }

    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
        let features = self.preprocessor.transform(record)?;
        if features.len() != self.preprocessor.output_width() {
            return Err(ModelError::WidthMismatch {
                expected: self.preprocessor.output_width(),
                actual: features.len(),
            });
        }
        Ok(features)
    }

    /// Yield estimate for one feature record
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        let features = self.transform(record)?;
        let estimate = self.regressor.predict(&features);
        if !estimate.is_finite() {
            return Err(ModelError::NonFinitePrediction);
        }
        Ok(estimate)
    }
}

/// Shared handle used by the advisory and recommendation paths
#[derive(Debug, Clone)]
pub struct YieldPredictor {
    pipeline: Arc<Pipeline>,
}

impl YieldPredictor {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<f64, ModelError> {
        self.pipeline.predict(record)
    }
}
