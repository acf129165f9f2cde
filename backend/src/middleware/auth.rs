//! Authentication middleware
//!
//! Validates the admin's Bearer JWT and exposes the authenticated admin to
//! handlers. This replaces the legacy unsigned "adminId:timestamp" cookie
//! with a signed, expiring token.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

use crate::error::{AppError, ErrorResponse};

/// Authenticated admin extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub admin_id: uuid::Uuid,
}

/// Authentication middleware that validates JWT tokens.
/// Token validation is done inline to avoid state dependency issues.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return AppError::Unauthorized(
                "Missing or invalid Authorization header".to_string(),
            )
            .into_response();
        }
    };

    // JWT secret from the environment (middleware runs without app state)
    let jwt_secret = std::env::var("KOPI__JWT__SECRET")
        .or_else(|_| std::env::var("KOPI_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    let admin_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return AppError::InvalidToken.into_response(),
    };

    request.extensions_mut().insert(AuthAdmin { admin_id });

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate a JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

/// Extractor for the authenticated admin.
/// Use this in handlers to get the current admin.
#[derive(Clone, Debug)]
pub struct CurrentAdmin(pub AuthAdmin);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentAdmin
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthAdmin>()
            .cloned()
            .map(CurrentAdmin)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message_en: "Authentication required".to_string(),
                        message_id: "Autentikasi diperlukan".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_decodes() {
        let token = make_token("secret", 3600);
        assert!(decode_jwt(&token, "secret").is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = make_token("secret", 3600);
        assert!(matches!(
            decode_jwt(&token, "other"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = make_token("secret", -3600);
        assert!(matches!(
            decode_jwt(&token, "secret"),
            Err(AppError::TokenExpired)
        ));
    }
}
