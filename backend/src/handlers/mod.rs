//! HTTP handlers

pub mod crops;
pub mod health;
pub mod predict;

pub use crops::list_crops;
pub use health::health_check;
pub use predict::predict;
