//! Middleware for the Kopi Kita ordering platform

pub mod auth;

pub use auth::{auth_middleware, AuthAdmin, CurrentAdmin};
