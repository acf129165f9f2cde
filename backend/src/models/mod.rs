//! Database models for the Kopi Kita ordering platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
