//! Known-district registry
//!
//! Districts come from the coordinate table shipped with the model
//! (`District,Latitude,Longitude`). Only the names are used: a request is
//! served when its district, trimmed and lowercased, is in the table.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use shared::normalize_district;

use crate::error::{AppError, AppResult};

/// Decides whether a district may be served
pub trait DistrictValidator: Send + Sync {
    fn is_valid(&self, district: &str) -> bool;
}

#[derive(Debug, Deserialize)]
struct DistrictRow {
    #[serde(rename = "District")]
    district: String,
}

/// District names loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct DistrictRegistry {
    names: HashSet<String>,
}

impl DistrictRegistry {
    /// Build a registry from an explicit list of names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| normalize_district(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// Read the `District` column of a CSV file
    pub fn from_csv_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to open district table {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_reader(&mut reader)
    }

    fn from_reader<R: std::io::Read>(reader: &mut csv::Reader<R>) -> AppResult<Self> {
        let mut names = Vec::new();
        for row in reader.deserialize::<DistrictRow>() {
            let row = row.map_err(|e| {
                AppError::Configuration(format!("Malformed district table: {}", e))
            })?;
            names.push(row.district);
        }

        let registry = Self::from_names(names);
        if registry.is_empty() {
            return Err(AppError::Configuration(
                "District table contains no districts".to_string(),
            ));
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl DistrictValidator for DistrictRegistry {
    fn is_valid(&self, district: &str) -> bool {
        self.names.contains(&normalize_district(district))
    }
}
