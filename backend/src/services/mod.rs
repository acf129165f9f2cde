//! Business logic services
//!
//! Each service owns one slice of the domain and is constructed with a
//! database pool; handlers stay thin and delegate here.

pub mod analytics;
pub mod auth;
pub mod costing;
pub mod ingredient;
pub mod order;
pub mod product;
pub mod recipe;
pub mod reporting;
pub mod settings;
pub mod whatsapp;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use costing::CostingService;
pub use ingredient::IngredientService;
pub use order::OrderService;
pub use product::ProductService;
pub use recipe::RecipeService;
pub use reporting::ReportingService;
pub use settings::SettingsService;
