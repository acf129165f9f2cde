//! Error handling for the Kopi Kita ordering platform
//!
//! Provides consistent error responses in English and Indonesian

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_id: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Ingredient in use: {0}")]
    IngredientInUse(String),

    #[error("Completed order is locked against edits")]
    CompletedOrderLocked,

    // Cost propagation errors (the whole chain is transactional; a failure
    // here means nothing was changed downstream)
    #[error("Cost propagation failed: {0}")]
    PropagationFailed(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message_en: "Invalid email or password".to_string(),
                    message_id: "Email atau kata sandi salah".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message_en: "Token has expired".to_string(),
                    message_id: "Token sudah kedaluwarsa".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message_en: "Invalid token".to_string(),
                    message_id: "Token tidak valid".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_id: "Tidak diizinkan".to_string(),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_id,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_id: message_id.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_id: format!("Data tidak valid: {}", msg),
                    field: None,
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_id: format!("Data dengan {} ini sudah ada", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_id: format!("{} tidak ditemukan", resource),
                    field: None,
                },
            ),
            AppError::IngredientInUse(name) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "INGREDIENT_IN_USE".to_string(),
                    message_en: format!(
                        "Cannot delete ingredient '{}' while it is used in recipes. Remove it from all recipes first.",
                        name
                    ),
                    message_id: format!(
                        "Bahan '{}' masih dipakai dalam resep. Hapus dari semua resep terlebih dahulu.",
                        name
                    ),
                    field: None,
                },
            ),
            AppError::CompletedOrderLocked => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "ORDER_COMPLETED_LOCKED".to_string(),
                    message_en: "Cannot edit items for completed orders".to_string(),
                    message_id: "Pesanan yang sudah selesai tidak dapat diubah".to_string(),
                    field: None,
                },
            ),
            AppError::PropagationFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "COST_PROPAGATION_FAILED".to_string(),
                    message_en: format!("Recipe cost propagation failed and was rolled back: {}", msg),
                    message_id: "Gagal menghitung ulang biaya resep; perubahan dibatalkan".to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_id: "Terjadi kesalahan basis data".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_id: "Terjadi kesalahan internal server".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_id: "Terjadi kesalahan internal server".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
