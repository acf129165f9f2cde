//! Shared types and models for the Kopi Kita ordering platform
//!
//! This crate contains domain models, common types, and validation helpers
//! shared between the backend and its tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
