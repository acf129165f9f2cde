//! Admin authentication handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentAdmin;
use crate::services::auth::{ChangePasswordInput, InitInput, LoginInput, LoginResponse};
use crate::services::AuthService;
use crate::AppState;
use shared::models::AdminUser;

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.db.clone(), state.config.jwt.clone())
}

/// POST /admin/init - create the first admin account
pub async fn init(
    State(state): State<AppState>,
    Json(input): Json<InitInput>,
) -> AppResult<Json<AdminUser>> {
    Ok(Json(service(&state).init(input).await?))
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    Ok(Json(service(&state).login(input).await?))
}

/// GET /admin/profile
pub async fn profile(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> AppResult<Json<AdminUser>> {
    Ok(Json(service(&state).profile(admin.admin_id).await?))
}

/// PUT /admin/password
pub async fn change_password(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<Json<serde_json::Value>> {
    service(&state).change_password(admin.admin_id, input).await?;
    Ok(Json(serde_json::json!({ "updated": true })))
}
