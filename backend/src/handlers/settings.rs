//! Store settings handlers

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::settings::SettingsInput;
use crate::services::SettingsService;
use crate::AppState;
use shared::models::StoreSettings;

/// GET /settings
pub async fn get(State(state): State<AppState>) -> AppResult<Json<StoreSettings>> {
    Ok(Json(SettingsService::new(state.db.clone()).get().await?))
}

/// PUT /settings
pub async fn update(
    State(state): State<AppState>,
    Json(input): Json<SettingsInput>,
) -> AppResult<Json<StoreSettings>> {
    Ok(Json(
        SettingsService::new(state.db.clone()).update(input).await?,
    ))
}
