//! Domain models for the Crop Yield Advisor

mod crop;
mod features;
mod prediction;
mod weather;

pub use crop::*;
pub use features::*;
pub use prediction::*;
pub use weather::*;
