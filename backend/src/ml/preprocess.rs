//! Preprocessing stage of the yield pipeline
//!
//! Mirrors a column transformer: each transformer reads named columns from
//! the feature record and appends its outputs, in order, to the transformed
//! vector. Output names follow the `{transformer}__{column}` convention, with
//! the category appended for one-hot outputs.
//!
//! One-hot encoding ignores unknown categories: a district or crop the model
//! never saw encodes as an all-zero block instead of failing.

use serde::{Deserialize, Serialize};
use shared::{columns, FeatureRecord};

use super::ModelError;

/// One column transformer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transformer {
    /// Numeric columns copied unchanged
    Passthrough { name: String, columns: Vec<String> },
    /// Numeric columns standardized as `(x - mean) / scale`
    StandardScaler {
        name: String,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// Categorical columns expanded into indicator blocks
    OneHot {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
    },
}

impl Transformer {
    pub fn name(&self) -> &str {
        match self {
            Transformer::Passthrough { name, .. }
            | Transformer::StandardScaler { name, .. }
            | Transformer::OneHot { name, .. } => name,
        }
    }

    /// Number of values this transformer contributes
    pub fn width(&self) -> usize {
        match self {
            Transformer::Passthrough { columns, .. }
            | Transformer::StandardScaler { columns, .. } => columns.len(),
            Transformer::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
        }
    }

    fn feature_names(&self) -> Vec<String> {
        match self {
            Transformer::Passthrough { name, columns }
            | Transformer::StandardScaler { name, columns, .. } => columns
                .iter()
                .map(|column| format!("{}__{}", name, column))
                .collect(),
            Transformer::OneHot {
                name,
                columns,
                categories,
            } => columns
                .iter()
                .zip(categories)
                .flat_map(|(column, levels)| {
                    levels
                        .iter()
                        .map(move |level| format!("{}__{}_{}", name, column, level))
                })
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let unknown = |column: &str| ModelError::UnknownColumn {
            transformer: self.name().to_string(),
            column: column.to_string(),
        };
        let malformed = |reason: String| ModelError::InvalidTransformer {
            transformer: self.name().to_string(),
            reason,
        };

        match self {
            Transformer::Passthrough { columns: cols, .. } => {
                if let Some(column) = cols.iter().find(|c| !columns::NUMERIC.contains(&c.as_str())) {
                    return Err(unknown(column.as_str()));
                }
            }
            Transformer::StandardScaler {
                columns: cols,
                mean,
                scale,
                ..
            } => {
                if let Some(column) = cols.iter().find(|c| !columns::NUMERIC.contains(&c.as_str())) {
                    return Err(unknown(column.as_str()));
                }
                if mean.len() != cols.len() || scale.len() != cols.len() {
                    return Err(malformed(format!(
                        "{} columns but {} means and {} scales",
                        cols.len(),
                        mean.len(),
                        scale.len()
                    )));
                }
                if mean.iter().chain(scale).any(|v| !v.is_finite()) {
                    return Err(malformed("non-finite mean or scale".to_string()));
                }
            }
            Transformer::OneHot {
                columns: cols,
                categories,
                ..
            } => {
                if let Some(column) = cols
                    .iter()
                    .find(|c| !columns::CATEGORICAL.contains(&c.as_str()))
                {
                    return Err(unknown(column.as_str()));
                }
                if categories.len() != cols.len() {
                    return Err(malformed(format!(
                        "{} columns but {} category lists",
                        cols.len(),
                        categories.len()
                    )));
                }
            }
        }
        Ok(())
    }

    fn transform_into(&self, record: &FeatureRecord, out: &mut Vec<f64>) -> Result<(), ModelError> {
        let unknown = |column: &str| ModelError::UnknownColumn {
            transformer: self.name().to_string(),
            column: column.to_string(),
        };

        match self {
            Transformer::Passthrough { columns, .. } => {
                for column in columns {
                    out.push(record.numeric(column).ok_or_else(|| unknown(column.as_str()))?);
                }
            }
            Transformer::StandardScaler {
                columns,
                mean,
                scale,
                ..
            } => {
                for ((column, mean), scale) in columns.iter().zip(mean).zip(scale) {
                    let value = record.numeric(column).ok_or_else(|| unknown(column.as_str()))?;
                    // Zero-variance columns were fit with a unit scale
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    out.push((value - mean) / scale);
                }
            }
            Transformer::OneHot {
                columns,
                categories,
                ..
            } => {
                for (column, levels) in columns.iter().zip(categories) {
                    let value = record.categorical(column).ok_or_else(|| unknown(column.as_str()))?;
                    out.extend(levels.iter().map(|level| if level == value { 1.0 } else { 0.0 }));
                }
            }
        }
        Ok(())
    }
}

/// Ordered list of column transformers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preprocessor {
    pub transformers: Vec<Transformer>,
}

impl Preprocessor {
    pub fn new(transformers: Vec<Transformer>) -> Self {
        Self { transformers }
    }

    /// Length of the transformed vector
    pub fn output_width(&self) -> usize {
        self.transformers.iter().map(Transformer::width).sum()
    }

    /// Names of the transformed features, index-aligned with [`Self::transform`]
    pub fn feature_names(&self) -> Vec<String> {
        self.transformers
            .iter()
            .flat_map(Transformer::feature_names)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.transformers.iter().try_for_each(Transformer::validate)
    }

    /// Turn a feature record into the numeric vector the regressor consumes
    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>, ModelError> {
        let mut out = Vec::with_capacity(self.output_width());
        for transformer in &self.transformers {
            transformer.transform_into(record, &mut out)?;
        }
        Ok(out)
    }
}
