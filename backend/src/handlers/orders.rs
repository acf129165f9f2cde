//! Admin order management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::order::{OrderFilter, OrderUpdate, OrderWithDetails};
use crate::services::OrderService;
use crate::AppState;
use shared::types::PaginatedResponse;

/// GET /orders
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<PaginatedResponse<OrderWithDetails>>> {
    Ok(Json(OrderService::new(state.db.clone()).list(filter).await?))
}

/// GET /orders/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderWithDetails>> {
    Ok(Json(OrderService::new(state.db.clone()).get(id).await?))
}

/// PUT /orders/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<OrderUpdate>,
) -> AppResult<Json<OrderWithDetails>> {
    Ok(Json(
        OrderService::new(state.db.clone()).update(id, input).await?,
    ))
}

/// DELETE /orders/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    OrderService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /orders/:id/whatsapp-sent
pub async fn mark_whatsapp_sent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    OrderService::new(state.db.clone())
        .mark_whatsapp_sent(id)
        .await?;
    Ok(Json(serde_json::json!({ "whatsapp_sent": true })))
}
