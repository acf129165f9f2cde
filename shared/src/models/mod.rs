//! Domain models for the Kopi Kita ordering platform

pub mod admin;
pub mod ingredient;
pub mod order;
pub mod product;
pub mod recipe;
pub mod settings;

pub use admin::*;
pub use ingredient::*;
pub use order::*;
pub use product::*;
pub use recipe::*;
pub use settings::*;
