//! Ingredient and category handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentAdmin;
use crate::services::ingredient::{CategoryInput, IngredientInput, IngredientWithCategory};
use crate::services::{CostingService, IngredientService};
use crate::services::costing::PropagationSummary;
use crate::AppState;
use shared::models::{Ingredient, IngredientCategory, PriceHistoryEntry};

/// GET /ingredients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<IngredientWithCategory>>> {
    Ok(Json(IngredientService::new(state.db.clone()).list().await?))
}

/// GET /ingredients/low-stock
pub async fn low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    Ok(Json(
        IngredientService::new(state.db.clone()).low_stock().await?,
    ))
}

/// POST /ingredients
pub async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<IngredientInput>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    let ingredient = IngredientService::new(state.db.clone())
        .create(Some(admin.admin_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// PUT /ingredients/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    Json(input): Json<IngredientInput>,
) -> AppResult<Json<Ingredient>> {
    Ok(Json(
        IngredientService::new(state.db.clone())
            .update(Some(admin.admin_id), id, input)
            .await?,
    ))
}

/// DELETE /ingredients/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    IngredientService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /ingredients/:id/price-history
pub async fn price_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PriceHistoryEntry>>> {
    Ok(Json(
        IngredientService::new(state.db.clone())
            .price_history(id)
            .await?,
    ))
}

/// POST /ingredients/:id/propagate - re-run cost propagation on demand
pub async fn propagate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PropagationSummary>> {
    Ok(Json(
        CostingService::new(state.db.clone())
            .propagate_ingredient_cost(id)
            .await?,
    ))
}

/// GET /ingredient-categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<IngredientCategory>>> {
    Ok(Json(
        IngredientService::new(state.db.clone())
            .list_categories()
            .await?,
    ))
}

/// POST /ingredient-categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<IngredientCategory>)> {
    let category = IngredientService::new(state.db.clone())
        .create_category(input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}
