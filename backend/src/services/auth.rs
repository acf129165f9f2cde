//! Admin authentication: bootstrap, login, profile and password changes.
//!
//! Sessions are signed JWTs; passwords are bcrypt hashes.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use shared::models::AdminUser;
use shared::validation::{validate_email, validate_password};

/// Auth service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt: JwtConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct InitInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub admin: AdminUser,
}

#[derive(Debug, Serialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

#[derive(Debug, FromRow)]
struct AdminRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AdminRow> for AdminUser {
    fn from(r: AdminRow) -> Self {
        AdminUser {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            created_at: r.created_at,
        }
    }
}

impl AuthService {
    pub fn new(db: PgPool, jwt: JwtConfig) -> Self {
        Self { db, jwt }
    }

    /// Create the first admin account. Refused once any admin exists, so
    /// the endpoint is only usable to bootstrap a fresh install.
    pub async fn init(&self, input: InitInput) -> AppResult<AdminUser> {
        Self::check_credentials_shape(&input.email, &input.password)?;

        let admin_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_users")
                .fetch_one(&self.db)
                .await?;
        if admin_count > 0 {
            return Err(AppError::Unauthorized(
                "Admin account already initialized".to_string(),
            ));
        }

        let password_hash =
            hash(&input.password, DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))?;

        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admin_users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(input.email.trim().to_lowercase())
        .bind(password_hash)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(email = %row.email, "admin account initialized");
        Ok(row.into())
    }

    /// Verify credentials and issue a JWT. Wrong email and wrong password
    /// return the same error.
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginResponse> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE email = $1",
        )
        .bind(input.email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(row.id)?;
        Ok(LoginResponse {
            token,
            expires_in: self.jwt.access_token_expiry,
            admin: row.into(),
        })
    }

    pub async fn profile(&self, admin_id: Uuid) -> AppResult<AdminUser> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE id = $1",
        )
        .bind(admin_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin".to_string()))?;
        Ok(row.into())
    }

    /// Change the admin's password after re-verifying the current one
    pub async fn change_password(
        &self,
        admin_id: Uuid,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        validate_password(&input.new_password).map_err(|msg| AppError::Validation {
            field: "new_password".to_string(),
            message: msg.to_string(),
            message_id: "Kata sandi minimal 6 karakter".to_string(),
        })?;

        let current_hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM admin_users WHERE id = $1",
        )
        .bind(admin_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin".to_string()))?;

        let valid = verify(&input.current_password, &current_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = hash(&input.new_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        sqlx::query("UPDATE admin_users SET password_hash = $2 WHERE id = $1")
            .bind(admin_id)
            .bind(new_hash)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    fn issue_token(&self, admin_id: Uuid) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: admin_id.to_string(),
            exp: now + self.jwt.access_token_expiry,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    fn check_credentials_shape(email: &str, password: &str) -> AppResult<()> {
        validate_email(email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
            message_id: "Email tidak valid".to_string(),
        })?;
        validate_password(password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
            message_id: "Kata sandi minimal 6 karakter".to_string(),
        })?;
        Ok(())
    }
}
