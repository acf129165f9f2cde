//! Product catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::product::{
    BulkStockUpdate, CoffeeInput, CoffeeWithVariants, StockUpdate,
};
use crate::services::ProductService;
use crate::AppState;
use shared::models::CoffeeVariant;

/// GET /coffees
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CoffeeWithVariants>>> {
    Ok(Json(ProductService::new(state.db.clone()).list().await?))
}

/// GET /coffees/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CoffeeWithVariants>> {
    Ok(Json(ProductService::new(state.db.clone()).get(id).await?))
}

/// POST /coffees
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CoffeeInput>,
) -> AppResult<(StatusCode, Json<CoffeeWithVariants>)> {
    let coffee = ProductService::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(coffee)))
}

/// PUT /coffees/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CoffeeInput>,
) -> AppResult<Json<CoffeeWithVariants>> {
    Ok(Json(
        ProductService::new(state.db.clone()).update(id, input).await?,
    ))
}

/// DELETE /coffees/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ProductService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /variants/:id/stock
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<StockUpdate>,
) -> AppResult<Json<CoffeeVariant>> {
    Ok(Json(
        ProductService::new(state.db.clone())
            .update_stock(id, input)
            .await?,
    ))
}

/// PUT /variants/stock - bulk stock adjustment
pub async fn bulk_update_stock(
    State(state): State<AppState>,
    Json(input): Json<BulkStockUpdate>,
) -> AppResult<Json<serde_json::Value>> {
    let updated = ProductService::new(state.db.clone())
        .bulk_update_stock(input)
        .await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
