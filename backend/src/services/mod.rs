//! Business logic services for the Crop Yield Advisor

pub mod advisory;
pub mod district;
pub mod recommendation;

pub use advisory::AdvisoryService;
pub use district::{DistrictRegistry, DistrictValidator};
pub use recommendation::Recommender;
