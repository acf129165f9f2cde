//! Store settings: the single-row configuration the storefront and the
//! WhatsApp handoff read from.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use shared::models::StoreSettings;
use shared::validation::{validate_coordinates, validate_map_link, validate_whatsapp_number};

/// Settings service
#[derive(Clone)]
pub struct SettingsService {
    db: PgPool,
}

/// Update payload; omitted fields keep their current value
#[derive(Debug, Deserialize)]
pub struct SettingsInput {
    pub admin_whatsapp: Option<String>,
    pub store_name: Option<String>,
    pub currency: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_coordinates: Option<String>,
    pub pickup_map_link: Option<String>,
}

#[derive(Debug, FromRow)]
struct SettingsRow {
    admin_whatsapp: String,
    store_name: String,
    currency: String,
    pickup_address: String,
    pickup_coordinates: Option<String>,
    pickup_map_link: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for StoreSettings {
    fn from(r: SettingsRow) -> Self {
        StoreSettings {
            admin_whatsapp: r.admin_whatsapp,
            store_name: r.store_name,
            currency: r.currency,
            pickup_address: r.pickup_address,
            pickup_coordinates: r.pickup_coordinates,
            pickup_map_link: r.pickup_map_link,
            updated_at: r.updated_at,
        }
    }
}

impl SettingsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The store settings row. Seeded by the migrations, so it always exists.
    pub async fn get(&self) -> AppResult<StoreSettings> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT admin_whatsapp, store_name, currency, pickup_address,
                   pickup_coordinates, pickup_map_link, updated_at
            FROM store_settings
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Store settings".to_string()))?;
        Ok(row.into())
    }

    pub async fn update(&self, input: SettingsInput) -> AppResult<StoreSettings> {
        if let Some(number) = &input.admin_whatsapp {
            validate_whatsapp_number(number).map_err(|msg| AppError::Validation {
                field: "admin_whatsapp".to_string(),
                message: msg.to_string(),
                message_id: "Nomor WhatsApp tidak valid".to_string(),
            })?;
        }
        if let Some(name) = &input.store_name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "store_name".to_string(),
                    message: "Store name must not be empty".to_string(),
                    message_id: "Nama toko tidak boleh kosong".to_string(),
                });
            }
        }
        if let Some(coordinates) = input
            .pickup_coordinates
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        {
            validate_coordinates(coordinates).map_err(|msg| AppError::Validation {
                field: "pickup_coordinates".to_string(),
                message: msg.to_string(),
                message_id: "Koordinat tidak valid".to_string(),
            })?;
        }
        if let Some(link) = input
            .pickup_map_link
            .as_deref()
            .filter(|l| !l.trim().is_empty())
        {
            validate_map_link(link).map_err(|msg| AppError::Validation {
                field: "pickup_map_link".to_string(),
                message: msg.to_string(),
                message_id: "Tautan peta tidak valid".to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            UPDATE store_settings
            SET admin_whatsapp = COALESCE($1, admin_whatsapp),
                store_name = COALESCE($2, store_name),
                currency = COALESCE($3, currency),
                pickup_address = COALESCE($4, pickup_address),
                pickup_coordinates = COALESCE($5, pickup_coordinates),
                pickup_map_link = COALESCE($6, pickup_map_link),
                updated_at = NOW()
            RETURNING admin_whatsapp, store_name, currency, pickup_address,
                      pickup_coordinates, pickup_map_link, updated_at
            "#,
        )
        .bind(&input.admin_whatsapp)
        .bind(input.store_name.as_deref().map(str::trim))
        .bind(&input.currency)
        .bind(&input.pickup_address)
        .bind(&input.pickup_coordinates)
        .bind(&input.pickup_map_link)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Store settings".to_string()))?;

        Ok(row.into())
    }
}
