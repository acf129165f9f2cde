//! Product catalog: coffees and their sellable variants, for both the
//! public storefront and the admin back office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Coffee, CoffeeVariant};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating or updating a coffee with its variants
#[derive(Debug, Deserialize)]
pub struct CoffeeInput {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub best_seller: bool,
    pub variants: Vec<VariantInput>,
}

/// One variant within a coffee payload. `id` present means "update this
/// existing variant"; absent means "create".
#[derive(Debug, Deserialize)]
pub struct VariantInput {
    pub id: Option<Uuid>,
    pub size: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub stock: Option<i32>,
    pub available: Option<bool>,
}

/// Input for a single-variant stock adjustment
#[derive(Debug, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
    pub available: Option<bool>,
}

/// Input for adjusting several variants at once
#[derive(Debug, Deserialize)]
pub struct BulkStockUpdate {
    pub updates: Vec<BulkStockEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BulkStockEntry {
    pub variant_id: Uuid,
    pub stock: i32,
}

/// A coffee with all of its variants
#[derive(Debug, Serialize)]
pub struct CoffeeWithVariants {
    #[serde(flatten)]
    pub coffee: Coffee,
    pub variants: Vec<CoffeeVariant>,
}

#[derive(Debug, FromRow)]
struct CoffeeRow {
    id: Uuid,
    name: String,
    description: String,
    image: String,
    category: String,
    best_seller: bool,
    created_at: DateTime<Utc>,
}

impl From<CoffeeRow> for Coffee {
    fn from(r: CoffeeRow) -> Self {
        Coffee {
            id: r.id,
            name: r.name,
            description: r.description,
            image: r.image,
            category: r.category,
            best_seller: r.best_seller,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct VariantRow {
    id: Uuid,
    coffee_id: Uuid,
    size: String,
    price: Decimal,
    original_price: Decimal,
    cost_price: Decimal,
    profit_amount: Decimal,
    profit_percentage: Decimal,
    stock: i32,
    available: bool,
}

impl From<VariantRow> for CoffeeVariant {
    fn from(r: VariantRow) -> Self {
        CoffeeVariant {
            id: r.id,
            coffee_id: r.coffee_id,
            size: r.size,
            price: r.price,
            original_price: r.original_price,
            cost_price: r.cost_price,
            profit_amount: r.profit_amount,
            profit_percentage: r.profit_percentage,
            stock: r.stock,
            available: r.available,
        }
    }
}

const VARIANT_COLUMNS: &str = "id, coffee_id, size, price, original_price, cost_price, \
     profit_amount, profit_percentage, stock, available";

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Storefront menu: every coffee, with only sellable variants attached.
    /// Coffees whose variants are all sold out or hidden come back with an
    /// empty variant list so the storefront can render them disabled.
    pub async fn storefront(&self) -> AppResult<Vec<CoffeeWithVariants>> {
        let coffees = self.fetch_coffees().await?;
        let variants = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM coffee_variants ORDER BY price"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(Self::group(coffees, variants, true))
    }

    /// Admin listing: every coffee with every variant, hidden ones included
    pub async fn list(&self) -> AppResult<Vec<CoffeeWithVariants>> {
        let coffees = self.fetch_coffees().await?;
        let variants = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM coffee_variants ORDER BY price"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(Self::group(coffees, variants, false))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<CoffeeWithVariants> {
        let coffee = sqlx::query_as::<_, CoffeeRow>(
            "SELECT id, name, description, image, category, best_seller, created_at \
             FROM coffees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Coffee".to_string()))?;

        let variants = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM coffee_variants WHERE coffee_id = $1 ORDER BY price"
        ))
        .bind(id)
        .fetch_all(&self.db)
        .await?;

        Ok(CoffeeWithVariants {
            coffee: coffee.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a coffee together with at least one variant
    pub async fn create(&self, input: CoffeeInput) -> AppResult<CoffeeWithVariants> {
        Self::validate(&input)?;

        let mut tx = self.db.begin().await?;
        let coffee_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO coffees (name, description, image, category, best_seller)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.description.as_deref().unwrap_or(""))
        .bind(input.image.as_deref().unwrap_or(""))
        .bind(input.category.as_deref().unwrap_or("coffee"))
        .bind(input.best_seller)
        .fetch_one(&mut *tx)
        .await?;

        for variant in &input.variants {
            Self::insert_variant(&mut tx, coffee_id, variant).await?;
        }
        tx.commit().await?;

        self.get(coffee_id).await
    }

    /// Update a coffee and reconcile its variant set: payload variants with
    /// an id are updated in place, the rest are inserted, and variants
    /// missing from the payload are deleted along with their recipes.
    pub async fn update(&self, id: Uuid, input: CoffeeInput) -> AppResult<CoffeeWithVariants> {
        Self::validate(&input)?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM coffees WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Coffee".to_string()));
        }

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"
            UPDATE coffees
            SET name = $2, description = $3, image = $4, category = $5, best_seller = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.description.as_deref().unwrap_or(""))
        .bind(input.image.as_deref().unwrap_or(""))
        .bind(input.category.as_deref().unwrap_or("coffee"))
        .bind(input.best_seller)
        .execute(&mut *tx)
        .await?;

        let kept: Vec<Uuid> = input.variants.iter().filter_map(|v| v.id).collect();
        sqlx::query(
            "DELETE FROM coffee_variants WHERE coffee_id = $1 AND id <> ALL($2)",
        )
        .bind(id)
        .bind(&kept)
        .execute(&mut *tx)
        .await?;

        for variant in &input.variants {
            match variant.id {
                Some(variant_id) => {
                    // Price edits leave cost_price alone; profit fields are
                    // re-derived from the stored recipe cost.
                    let updated = sqlx::query(
                        r#"
                        UPDATE coffee_variants
                        SET size = $2, price = $3, original_price = $4, stock = $5,
                            available = $6,
                            profit_amount = $3 - cost_price,
                            profit_percentage = CASE WHEN $3 > 0
                                THEN ($3 - cost_price) / $3 * 100 ELSE 0 END
                        WHERE id = $1 AND coffee_id = $7
                        "#,
                    )
                    .bind(variant_id)
                    .bind(&variant.size)
                    .bind(variant.price)
                    .bind(variant.original_price.unwrap_or(variant.price))
                    .bind(variant.stock.unwrap_or(0))
                    .bind(variant.available.unwrap_or(true))
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                    if updated.rows_affected() == 0 {
                        return Err(AppError::NotFound("Variant".to_string()));
                    }
                }
                None => {
                    Self::insert_variant(&mut tx, id, variant).await?;
                }
            }
        }
        tx.commit().await?;

        self.get(id).await
    }

    /// Delete a coffee; variants, recipes and associations cascade
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM coffees WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Coffee".to_string()));
        }
        Ok(())
    }

    /// Set one variant's stock level (and optionally its availability flag)
    pub async fn update_stock(
        &self,
        variant_id: Uuid,
        input: StockUpdate,
    ) -> AppResult<CoffeeVariant> {
        if input.stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be negative".to_string(),
                message_id: "Stok tidak boleh negatif".to_string(),
            });
        }

        let row = sqlx::query_as::<_, VariantRow>(&format!(
            r#"
            UPDATE coffee_variants
            SET stock = $2, available = COALESCE($3, available)
            WHERE id = $1
            RETURNING {VARIANT_COLUMNS}
            "#
        ))
        .bind(variant_id)
        .bind(input.stock)
        .bind(input.available)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Variant".to_string()))?;

        Ok(row.into())
    }

    /// Apply several stock levels in one transaction. Any unknown variant
    /// aborts the whole batch.
    pub async fn bulk_update_stock(&self, input: BulkStockUpdate) -> AppResult<u64> {
        if input.updates.is_empty() {
            return Err(AppError::ValidationError("updates must not be empty".to_string()));
        }
        if input.updates.iter().any(|u| u.stock < 0) {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be negative".to_string(),
                message_id: "Stok tidak boleh negatif".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        let mut updated = 0u64;
        for entry in &input.updates {
            let result = sqlx::query("UPDATE coffee_variants SET stock = $2 WHERE id = $1")
                .bind(entry.variant_id)
                .bind(entry.stock)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("Variant".to_string()));
            }
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }

    async fn fetch_coffees(&self) -> AppResult<Vec<CoffeeRow>> {
        let rows = sqlx::query_as::<_, CoffeeRow>(
            "SELECT id, name, description, image, category, best_seller, created_at \
             FROM coffees ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    fn group(
        coffees: Vec<CoffeeRow>,
        variants: Vec<VariantRow>,
        sellable_only: bool,
    ) -> Vec<CoffeeWithVariants> {
        let variants: Vec<CoffeeVariant> = variants.into_iter().map(Into::into).collect();
        coffees
            .into_iter()
            .map(|c| {
                let coffee: Coffee = c.into();
                let own: Vec<CoffeeVariant> = variants
                    .iter()
                    .filter(|v| v.coffee_id == coffee.id)
                    .filter(|v| !sellable_only || v.is_sellable())
                    .cloned()
                    .collect();
                CoffeeWithVariants {
                    coffee,
                    variants: own,
                }
            })
            .collect()
    }

    async fn insert_variant(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        coffee_id: Uuid,
        variant: &VariantInput,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO coffee_variants
                (coffee_id, size, price, original_price, stock, available)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(coffee_id)
        .bind(&variant.size)
        .bind(variant.price)
        .bind(variant.original_price.unwrap_or(variant.price))
        .bind(variant.stock.unwrap_or(0))
        .bind(variant.available.unwrap_or(true))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    fn validate(input: &CoffeeInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name is required".to_string(),
                message_id: "Nama wajib diisi".to_string(),
            });
        }
        if input.variants.is_empty() {
            return Err(AppError::Validation {
                field: "variants".to_string(),
                message: "At least one variant is required".to_string(),
                message_id: "Minimal satu varian wajib diisi".to_string(),
            });
        }
        for variant in &input.variants {
            if variant.size.trim().is_empty() || variant.price <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "variants".to_string(),
                    message: "Each variant needs a size and a positive price".to_string(),
                    message_id: "Setiap varian membutuhkan ukuran dan harga positif".to_string(),
                });
            }
        }
        Ok(())
    }
}
