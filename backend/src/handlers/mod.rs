//! HTTP request handlers
//!
//! Handlers stay thin: extract, delegate to a service, wrap the result.

pub mod analytics;
pub mod auth;
pub mod ingredients;
pub mod orders;
pub mod products;
pub mod recipes;
pub mod reports;
pub mod settings;
pub mod storefront;
