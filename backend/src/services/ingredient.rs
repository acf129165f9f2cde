//! Ingredient management service: inventory catalog, categories,
//! package-based costing and the price-history audit log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::costing::{as_propagation_failure, CostingService};
use shared::models::{package_unit_cost, Ingredient, IngredientCategory, PriceHistoryEntry};

/// Ingredient service
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
}

/// Input for creating or updating an ingredient
#[derive(Debug, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub cost_per_unit: Option<Decimal>,
    pub supplier: Option<String>,
    pub category_id: Option<Uuid>,
    pub minimum_stock: Option<Decimal>,
    pub current_stock: Option<Decimal>,
    pub is_active: Option<bool>,
    pub package_size: Option<Decimal>,
    pub package_price: Option<Decimal>,
    #[serde(default)]
    pub use_auto_calculate: bool,
}

/// Input for creating an ingredient category
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Ingredient joined with its category for admin listings
#[derive(Debug, Serialize)]
pub struct IngredientWithCategory {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub category_name: String,
    pub category_color: String,
}

#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    unit: String,
    cost_per_unit: Decimal,
    supplier: Option<String>,
    category_id: Uuid,
    current_stock: Decimal,
    minimum_stock: Decimal,
    is_active: bool,
    package_size: Option<Decimal>,
    package_price: Option<Decimal>,
    last_package_update: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(r: IngredientRow) -> Self {
        Ingredient {
            id: r.id,
            name: r.name,
            description: r.description,
            unit: r.unit,
            cost_per_unit: r.cost_per_unit,
            supplier: r.supplier,
            category_id: r.category_id,
            current_stock: r.current_stock,
            minimum_stock: r.minimum_stock,
            is_active: r.is_active,
            package_size: r.package_size,
            package_price: r.package_price,
            last_package_update: r.last_package_update,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct IngredientWithCategoryRow {
    #[sqlx(flatten)]
    ingredient: IngredientRow,
    category_name: String,
    category_color: String,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    color: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct PriceHistoryRow {
    id: Uuid,
    ingredient_id: Uuid,
    old_price: Decimal,
    new_price: Decimal,
    change_reason: String,
    changed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

const INGREDIENT_COLUMNS: &str = "id, name, description, unit, cost_per_unit, supplier, \
     category_id, current_stock, minimum_stock, is_active, package_size, package_price, \
     last_package_update, created_at, updated_at";

impl IngredientService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all ingredients with their category, ordered by name
    pub async fn list(&self) -> AppResult<Vec<IngredientWithCategory>> {
        let rows = sqlx::query_as::<_, IngredientWithCategoryRow>(
            r#"
            SELECT i.id, i.name, i.description, i.unit, i.cost_per_unit, i.supplier,
                   i.category_id, i.current_stock, i.minimum_stock, i.is_active,
                   i.package_size, i.package_price, i.last_package_update,
                   i.created_at, i.updated_at,
                   c.name AS category_name, c.color AS category_color
            FROM ingredients i
            INNER JOIN ingredient_categories c ON c.id = i.category_id
            ORDER BY i.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| IngredientWithCategory {
                ingredient: r.ingredient.into(),
                category_name: r.category_name,
                category_color: r.category_color,
            })
            .collect())
    }

    /// Active ingredients at or below their minimum stock level
    pub async fn low_stock(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE is_active ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(Ingredient::from)
            .filter(Ingredient::is_low_stock)
            .collect())
    }

    /// Create a new ingredient.
    ///
    /// With `use_auto_calculate` and a valid package, `cost_per_unit` is
    /// derived from the package price; the initial derived price is logged
    /// to the price history.
    pub async fn create(
        &self,
        admin_id: Option<Uuid>,
        input: IngredientInput,
    ) -> AppResult<Ingredient> {
        let resolved = ResolvedCost::from_input(&input)?;
        let category_id = Self::require_category(&input)?;
        Self::require_name_and_unit(&input)?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE name = $1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;
        if duplicate {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            INSERT INTO ingredients (
                name, description, unit, cost_per_unit, supplier, category_id,
                minimum_stock, current_stock, is_active, package_size, package_price,
                last_package_update
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.unit)
        .bind(resolved.cost_per_unit)
        .bind(&input.supplier)
        .bind(category_id)
        .bind(input.minimum_stock.unwrap_or(Decimal::ZERO))
        .bind(input.current_stock.unwrap_or(Decimal::ZERO))
        .bind(input.is_active.unwrap_or(true))
        .bind(resolved.package_size)
        .bind(resolved.package_price)
        .bind(resolved.auto_calculated.then(Utc::now))
        .fetch_one(&mut *tx)
        .await?;

        if resolved.auto_calculated {
            Self::append_price_history(
                &mut tx,
                row.id,
                Decimal::ZERO,
                resolved.cost_per_unit,
                &resolved.change_reason(&input.unit, true),
                admin_id,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Update an ingredient. A cost change appends one price-history row
    /// and propagates through every dependent recipe and variant, all in a
    /// single transaction.
    pub async fn update(
        &self,
        admin_id: Option<Uuid>,
        id: Uuid,
        input: IngredientInput,
    ) -> AppResult<Ingredient> {
        let resolved = ResolvedCost::from_input(&input)?;
        let category_id = Self::require_category(&input)?;
        Self::require_name_and_unit(&input)?;

        let old_cost = sqlx::query_scalar::<_, Decimal>(
            "SELECT cost_per_unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE name = $1 AND id <> $2)",
        )
        .bind(&input.name)
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        if duplicate {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            UPDATE ingredients
            SET name = $2, description = $3, unit = $4, cost_per_unit = $5,
                supplier = $6, category_id = $7, minimum_stock = $8,
                current_stock = $9, is_active = $10, package_size = $11,
                package_price = $12,
                last_package_update = CASE WHEN $13 THEN NOW() ELSE last_package_update END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.unit)
        .bind(resolved.cost_per_unit)
        .bind(&input.supplier)
        .bind(category_id)
        .bind(input.minimum_stock.unwrap_or(Decimal::ZERO))
        .bind(input.current_stock.unwrap_or(Decimal::ZERO))
        .bind(input.is_active.unwrap_or(true))
        .bind(resolved.package_size)
        .bind(resolved.package_price)
        .bind(resolved.auto_calculated)
        .fetch_one(&mut *tx)
        .await?;

        // Cost change: audit it, then re-derive the dependent cost chain
        // before anything is committed.
        if old_cost != resolved.cost_per_unit {
            Self::append_price_history(
                &mut tx,
                id,
                old_cost,
                resolved.cost_per_unit,
                &resolved.change_reason(&input.unit, false),
                admin_id,
            )
            .await?;

            CostingService::propagate_on(&mut tx, id)
                .await
                .map_err(as_propagation_failure)?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete an ingredient. Blocked while any recipe references it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        let in_use = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM recipe_ingredients WHERE ingredient_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;
        if in_use {
            return Err(AppError::IngredientInUse(name));
        }

        sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Price-change history for an ingredient, newest first
    pub async fn price_history(&self, ingredient_id: Uuid) -> AppResult<Vec<PriceHistoryEntry>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = $1)",
        )
        .bind(ingredient_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        let rows = sqlx::query_as::<_, PriceHistoryRow>(
            r#"
            SELECT id, ingredient_id, old_price, new_price, change_reason, changed_by, created_at
            FROM ingredient_price_history
            WHERE ingredient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(ingredient_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PriceHistoryEntry {
                id: r.id,
                ingredient_id: r.ingredient_id,
                old_price: r.old_price,
                new_price: r.new_price,
                change_reason: r.change_reason,
                changed_by: r.changed_by,
                created_at: r.created_at,
            })
            .collect())
    }

    /// List ingredient categories, ordered by name
    pub async fn list_categories(&self) -> AppResult<Vec<IngredientCategory>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, color, created_at FROM ingredient_categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| IngredientCategory {
                id: r.id,
                name: r.name,
                description: r.description,
                color: r.color,
                created_at: r.created_at,
            })
            .collect())
    }

    /// Create an ingredient category
    pub async fn create_category(&self, input: CategoryInput) -> AppResult<IngredientCategory> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name is required".to_string(),
                message_id: "Nama wajib diisi".to_string(),
            });
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredient_categories WHERE name = $1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;
        if duplicate {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO ingredient_categories (name, description, color)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, color, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.color.as_deref().unwrap_or("#6B7280"))
        .fetch_one(&self.db)
        .await?;

        Ok(IngredientCategory {
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
            created_at: row.created_at,
        })
    }

    fn require_category(input: &IngredientInput) -> AppResult<Uuid> {
        input.category_id.ok_or_else(|| AppError::Validation {
            field: "category_id".to_string(),
            message: "Name, unit, cost_per_unit, and category_id are required".to_string(),
            message_id: "Nama, satuan, harga per satuan, dan kategori wajib diisi".to_string(),
        })
    }

    fn require_name_and_unit(input: &IngredientInput) -> AppResult<()> {
        if input.name.trim().is_empty() || input.unit.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name, unit, cost_per_unit, and category_id are required".to_string(),
                message_id: "Nama, satuan, harga per satuan, dan kategori wajib diisi".to_string(),
            });
        }
        Ok(())
    }

    async fn append_price_history(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ingredient_id: Uuid,
        old_price: Decimal,
        new_price: Decimal,
        reason: &str,
        changed_by: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ingredient_price_history (ingredient_id, old_price, new_price, change_reason, changed_by)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ingredient_id)
        .bind(old_price)
        .bind(new_price)
        .bind(reason)
        .bind(changed_by)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

/// The cost_per_unit that will actually be written, and where it came from
struct ResolvedCost {
    cost_per_unit: Decimal,
    package_size: Option<Decimal>,
    package_price: Option<Decimal>,
    auto_calculated: bool,
}

impl ResolvedCost {
    fn from_input(input: &IngredientInput) -> AppResult<Self> {
        if input.use_auto_calculate {
            if let (Some(size), Some(price)) = (input.package_size, input.package_price) {
                if let Some(cost) = package_unit_cost(size, price) {
                    return Ok(Self {
                        cost_per_unit: cost,
                        package_size: Some(size),
                        package_price: Some(price),
                        auto_calculated: true,
                    });
                }
            }
        }

        let cost = input.cost_per_unit.ok_or_else(|| AppError::Validation {
            field: "cost_per_unit".to_string(),
            message: "Name, unit, cost_per_unit, and category_id are required".to_string(),
            message_id: "Nama, satuan, harga per satuan, dan kategori wajib diisi".to_string(),
        })?;

        // Package fields are kept as entered even when the cost is manual
        Ok(Self {
            cost_per_unit: cost,
            package_size: input.package_size,
            package_price: input.package_price,
            auto_calculated: false,
        })
    }

    fn change_reason(&self, unit: &str, initial: bool) -> String {
        match (self.auto_calculated, self.package_size, self.package_price) {
            (true, Some(size), Some(price)) if initial => {
                format!(
                    "Initial price auto-calculated from package: {}{} @ Rp{}",
                    size, unit, price
                )
            }
            (true, Some(size), Some(price)) => {
                format!("Auto-calculated from package: {}{} @ Rp{}", size, unit, price)
            }
            _ => "Manual update via admin panel".to_string(),
        }
    }
}
