//! API route definitions
//!
//! Public routes cover the storefront and auth bootstrap; everything else
//! sits behind the JWT middleware.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    analytics, auth, ingredients, orders, products, recipes, reports, settings, storefront,
};
use crate::middleware::auth_middleware;
use crate::AppState;

/// Build the /api/v1 router
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(admin_routes())
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/storefront", get(storefront::storefront))
        .route("/orders", post(storefront::checkout))
        .route("/orders/:id/whatsapp-sent", post(orders::mark_whatsapp_sent))
        .route("/admin/init", post(auth::init))
        .route("/admin/login", post(auth::login))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/profile", get(auth::profile))
        .route("/admin/password", put(auth::change_password))
        .route("/orders", get(orders::list))
        .route(
            "/orders/:id",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/coffees", get(products::list).post(products::create))
        .route(
            "/coffees/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/variants/stock", put(products::bulk_update_stock))
        .route("/variants/:id/stock", put(products::update_stock))
        .route("/variants/:id/recipe", get(recipes::for_variant))
        .route("/recipes", get(recipes::list))
        .route("/recipes/:id", put(recipes::update))
        .route("/recipes/:id/ingredients", post(recipes::add_association))
        .route(
            "/recipe-ingredients/:id",
            put(recipes::update_association).delete(recipes::remove_association),
        )
        .route(
            "/ingredients",
            get(ingredients::list).post(ingredients::create),
        )
        .route("/ingredients/low-stock", get(ingredients::low_stock))
        .route(
            "/ingredients/:id",
            put(ingredients::update).delete(ingredients::delete),
        )
        .route(
            "/ingredients/:id/price-history",
            get(ingredients::price_history),
        )
        .route("/ingredients/:id/propagate", post(ingredients::propagate))
        .route(
            "/ingredient-categories",
            get(ingredients::list_categories).post(ingredients::create_category),
        )
        .route("/analytics/summary", get(analytics::summary))
        .route("/analytics/sales", get(analytics::sales_by_period))
        .route("/analytics/profitability", get(analytics::profitability))
        .route("/analytics/top-products", get(analytics::top_products))
        .route("/reports/sales", get(reports::sales_report))
        .route("/reports/orders/export", get(reports::export_orders))
        .route("/settings", get(settings::get).put(settings::update))
        .route_layer(middleware::from_fn(auth_middleware))
}
