//! Crop economics table
//!
//! Minimum support prices (MSP, per quintal) and seasonal crop water
//! requirements. The order of [`CROP_TABLE`] is significant: it is the
//! iteration order used when ranking alternative crops, so crops with equal
//! projected revenue are reported in this order.

use serde::Serialize;

/// Economics of a single crop
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CropRecord {
    pub name: &'static str,
    /// Minimum support price per quintal (100 kg)
    pub msp_per_quintal: f64,
    /// Seasonal water requirement in mm
    pub water_req_mm: f64,
}

impl CropRecord {
    const fn new(name: &'static str, msp_per_quintal: f64, water_req_mm: f64) -> Self {
        Self {
            name,
            msp_per_quintal,
            water_req_mm,
        }
    }

    /// Revenue for a yield estimate: yield / 100 × MSP
    pub fn revenue(&self, yield_estimate: f64) -> f64 {
        (yield_estimate / 100.0) * self.msp_per_quintal
    }

    /// Irrigation still needed after rainfall: max(0, water requirement − rainfall)
    pub fn irrigation_needed(&self, rainfall_mm: f64) -> f64 {
        (self.water_req_mm - rainfall_mm).max(0.0)
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// All crops known to the advisor, in ranking tie-break order
pub const CROP_TABLE: &[CropRecord] = &[
    CropRecord::new("Rice", 2300.0, 1300.0),
    CropRecord::new("Wheat", 2275.0, 550.0),
    CropRecord::new("Maize", 2225.0, 650.0),
    CropRecord::new("Sugarcane", 340.0, 2000.0),
    CropRecord::new("Cotton", 7121.0, 800.0),
    CropRecord::new("Soyabean", 4892.0, 600.0),
    CropRecord::new("Pigeonpea", 7550.0, 450.0),
    CropRecord::new("Chickpea", 5440.0, 400.0),
    CropRecord::new("Rapeseed & Mustard", 5650.0, 350.0),
    CropRecord::new("Groundnut", 6783.0, 600.0),
    CropRecord::new("Sunflower", 7280.0, 650.0),
    CropRecord::new("Barley", 1850.0, 350.0),
    CropRecord::new("Pearl Millet", 2625.0, 300.0),
    CropRecord::new("Kharif Sorghum", 3371.0, 500.0),
    CropRecord::new("Rabi Sorghum", 3371.0, 400.0),
    CropRecord::new("Castor", 7515.0, 450.0),
    CropRecord::new("Finger Millet", 4290.0, 400.0),
    CropRecord::new("Linseed", 5650.0, 350.0),
    CropRecord::new("Safflower", 5800.0, 300.0),
    CropRecord::new("Sesamum", 9267.0, 400.0),
    CropRecord::new("Onion", 2000.0, 450.0),
    CropRecord::new("Potatoes", 1500.0, 600.0),
];

/// Look up a crop by name, ignoring case and surrounding whitespace
pub fn find_crop(name: &str) -> Option<&'static CropRecord> {
    CROP_TABLE.iter().find(|crop| crop.matches(name))
}
