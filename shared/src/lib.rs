//! Shared types and models for the Crop Yield Advisor
//!
//! This crate contains the domain records shared between the backend, the
//! browser helpers (via WASM), and any other component of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
