//! Yield model inference
//!
//! The trained pipeline is shipped as a JSON artifact: a preprocessing stage
//! that turns a [`shared::FeatureRecord`] into a numeric vector, followed by
//! a tree-ensemble regressor. Both are loaded once at startup and shared
//! read-only between requests.

mod explainer;
mod pipeline;
mod preprocess;
mod shap;
mod tree;

pub use explainer::AttributionExplainer;
pub use pipeline::{Pipeline, YieldPredictor};
pub use preprocess::{Preprocessor, Transformer};
pub use shap::{tree_shap, ShapValues};
pub use tree::{Aggregation, Node, Tree, TreeEnsemble};

use thiserror::Error;

/// Model loading and inference errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Transformer '{transformer}' references unknown column '{column}'")]
    UnknownColumn { transformer: String, column: String },

    #[error("Transformer '{transformer}' is malformed: {reason}")]
    InvalidTransformer { transformer: String, reason: String },

    #[error("Tree {tree} is malformed: {reason}")]
    InvalidTree { tree: usize, reason: String },

    #[error("Feature vector has {actual} values, model expects {expected}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite yield estimate")]
    NonFinitePrediction,
}
