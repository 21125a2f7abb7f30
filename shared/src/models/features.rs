//! Model feature records
//!
//! The yield pipeline was fit on a table with the column names below, a
//! lowercase district and an uppercase crop. A record with different casing
//! is not rejected by the model; it is encoded as an unseen category and the
//! prediction silently degrades. Assembly therefore normalizes both names.

use serde::{Deserialize, Serialize};

use crate::models::WeatherObservation;
use crate::validation::{normalize_crop, normalize_district};

/// Column names of the training table
pub mod columns {
    pub const YEAR: &str = "Year";
    pub const AREA: &str = "Area (1000 ha)";
    pub const TEMP_AVG: &str = "temp_avg";
    pub const TEMP_MAX: &str = "temp_max";
    pub const TEMP_MIN: &str = "temp_min";
    pub const HUMIDITY: &str = "humidity";
    pub const RAINFALL: &str = "rainfall";
    pub const DISTRICT: &str = "Dist Name";
    pub const CROP: &str = "Crop";

    pub const NUMERIC: &[&str] = &[YEAR, AREA, TEMP_AVG, TEMP_MAX, TEMP_MIN, HUMIDITY, RAINFALL];
    pub const CATEGORICAL: &[&str] = &[DISTRICT, CROP];
}

/// One row of model input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRecord {
    pub year: i32,
    /// Cultivated area in thousand hectares
    pub area_normalized: f64,
    pub temp_avg: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
    pub rainfall: f64,
    /// Lowercase district name
    pub district: String,
    /// Uppercase crop name
    pub crop: String,
}

impl FeatureRecord {
    /// Build a feature record from request parameters and a weather observation.
    ///
    /// `area` is taken as given; callers choose the unit conversion (see
    /// [`crate::AreaUnits`]).
    pub fn assemble(
        district: &str,
        year: i32,
        area: f64,
        crop: &str,
        weather: &WeatherObservation,
    ) -> Self {
        Self {
            year,
            area_normalized: area,
            temp_avg: weather.temp_avg,
            temp_max: weather.temp_max,
            temp_min: weather.temp_min,
            humidity: weather.humidity,
            rainfall: weather.rainfall,
            district: normalize_district(district),
            crop: normalize_crop(crop),
        }
    }

    /// Value of a numeric training column
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            columns::YEAR => Some(f64::from(self.year)),
            columns::AREA => Some(self.area_normalized),
            columns::TEMP_AVG => Some(self.temp_avg),
            columns::TEMP_MAX => Some(self.temp_max),
            columns::TEMP_MIN => Some(self.temp_min),
            columns::HUMIDITY => Some(self.humidity),
            columns::RAINFALL => Some(self.rainfall),
            _ => None,
        }
    }

    /// Value of a categorical training column
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            columns::DISTRICT => Some(&self.district),
            columns::CROP => Some(&self.crop),
            _ => None,
        }
    }
}
