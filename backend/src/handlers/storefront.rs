//! Public storefront handlers: the menu and checkout

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::order::{OrderInput, OrderWithDetails};
use crate::services::product::CoffeeWithVariants;
use crate::services::{whatsapp, OrderService, ProductService, SettingsService};
use crate::AppState;

/// Menu plus the store details the storefront renders
#[derive(Serialize)]
pub struct StorefrontResponse {
    pub store_name: String,
    pub currency: String,
    pub pickup_address: String,
    pub pickup_coordinates: Option<String>,
    pub pickup_map_link: Option<String>,
    pub coffees: Vec<CoffeeWithVariants>,
}

/// Checkout result: the persisted order and the WhatsApp handoff link the
/// storefront opens next
#[derive(Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub order: OrderWithDetails,
    pub whatsapp_url: String,
    pub whatsapp_message: String,
}

/// GET /storefront
pub async fn storefront(State(state): State<AppState>) -> AppResult<Json<StorefrontResponse>> {
    let settings = SettingsService::new(state.db.clone()).get().await?;
    let coffees = ProductService::new(state.db.clone()).storefront().await?;

    Ok(Json(StorefrontResponse {
        store_name: settings.store_name,
        currency: settings.currency,
        pickup_address: settings.pickup_address,
        pickup_coordinates: settings.pickup_coordinates,
        pickup_map_link: settings.pickup_map_link,
        coffees,
    }))
}

/// POST /orders - storefront checkout
pub async fn checkout(
    State(state): State<AppState>,
    Json(input): Json<OrderInput>,
) -> AppResult<Json<CheckoutResponse>> {
    let order = OrderService::new(state.db.clone()).create(input).await?;
    let settings = SettingsService::new(state.db.clone()).get().await?;

    let message = whatsapp::order_message(&order, &settings);
    let url = whatsapp::handoff_link(&settings.admin_whatsapp, &message);

    Ok(Json(CheckoutResponse {
        order,
        whatsapp_url: url,
        whatsapp_message: message,
    }))
}
