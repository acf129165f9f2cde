//! Recipe and association handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::recipe::{
    AssociationDetail, AssociationInput, AssociationUpdate, RecipeDetail, RecipeSummary,
    RecipeUpdate,
};
use crate::services::RecipeService;
use crate::AppState;
use shared::models::Recipe;

/// GET /recipes
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<RecipeSummary>>> {
    Ok(Json(RecipeService::new(state.db.clone()).list().await?))
}

/// GET /variants/:id/recipe - fetch (or lazily create) a variant's recipe
pub async fn for_variant(
    State(state): State<AppState>,
    Path(variant_id): Path<Uuid>,
) -> AppResult<Json<RecipeDetail>> {
    Ok(Json(
        RecipeService::new(state.db.clone())
            .for_variant(variant_id)
            .await?,
    ))
}

/// PUT /recipes/:id - rename or change serving size
pub async fn update(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(input): Json<RecipeUpdate>,
) -> AppResult<Json<Recipe>> {
    Ok(Json(
        RecipeService::new(state.db.clone())
            .update(recipe_id, input)
            .await?,
    ))
}

/// POST /recipes/:id/ingredients
pub async fn add_association(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(input): Json<AssociationInput>,
) -> AppResult<(StatusCode, Json<AssociationDetail>)> {
    let association = RecipeService::new(state.db.clone())
        .add_association(recipe_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(association)))
}

/// PUT /recipe-ingredients/:id
pub async fn update_association(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AssociationUpdate>,
) -> AppResult<Json<AssociationDetail>> {
    Ok(Json(
        RecipeService::new(state.db.clone())
            .update_association(id, input)
            .await?,
    ))
}

/// DELETE /recipe-ingredients/:id
pub async fn remove_association(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    RecipeService::new(state.db.clone())
        .remove_association(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
