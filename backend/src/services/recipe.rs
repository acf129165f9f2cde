//! Recipe management: one recipe per sellable variant, plus the
//! ingredient associations that drive its estimated cost.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::costing::{as_propagation_failure, CostingService};
use shared::models::{association_cost, Recipe};

const RECIPE_COLUMNS: &str =
    "id, variant_id, name, serving_size, estimated_cost, created_at, updated_at";

/// Recipe service
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

/// Input for attaching an ingredient to a recipe
#[derive(Debug, Deserialize)]
pub struct AssociationInput {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub notes: Option<String>,
}

/// Input for amending an existing association
#[derive(Debug, Deserialize)]
pub struct AssociationUpdate {
    pub quantity: Decimal,
    pub notes: Option<String>,
}

/// Partial update of a recipe's own fields
#[derive(Debug, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub serving_size: Option<Decimal>,
}

/// One association row joined with its ingredient for display
#[derive(Debug, Serialize, FromRow)]
pub struct AssociationDetail {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub ingredient_unit: String,
    pub cost_per_unit: Decimal,
    pub quantity: Decimal,
    pub cost: Decimal,
    pub notes: Option<String>,
}

/// Recipe summary for the admin recipe list
#[derive(Debug, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub variant_id: Uuid,
    pub name: String,
    pub serving_size: Decimal,
    pub variant_size: String,
    pub variant_price: Decimal,
    pub coffee_name: String,
    pub estimated_cost: Decimal,
    pub ingredient_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// A variant's recipe with all its associations
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<AssociationDetail>,
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: Uuid,
    variant_id: Uuid,
    name: String,
    serving_size: Decimal,
    estimated_cost: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            variant_id: row.variant_id,
            name: row.name,
            serving_size: row.serving_size,
            estimated_cost: row.estimated_cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl RecipeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All recipes with their variant and product names, newest first
    pub async fn list(&self) -> AppResult<Vec<RecipeSummary>> {
        let rows = sqlx::query_as::<_, RecipeSummary>(
            r#"
            SELECT r.id, r.variant_id, r.name, r.serving_size,
                   v.size AS variant_size, v.price AS variant_price,
                   c.name AS coffee_name, r.estimated_cost,
                   (SELECT COUNT(*) FROM recipe_ingredients ri WHERE ri.recipe_id = r.id)
                       AS ingredient_count,
                   r.updated_at
            FROM variant_recipes r
            INNER JOIN coffee_variants v ON v.id = r.variant_id
            INNER JOIN coffees c ON c.id = v.coffee_id
            ORDER BY r.updated_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    /// The recipe for a variant, created empty on first access. The lazily
    /// created recipe is named after the variant it belongs to.
    pub async fn for_variant(&self, variant_id: Uuid) -> AppResult<RecipeDetail> {
        let variant_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM coffee_variants WHERE id = $1)",
        )
        .bind(variant_id)
        .fetch_one(&self.db)
        .await?;
        if !variant_exists {
            return Err(AppError::NotFound("Variant".to_string()));
        }

        let recipe = match sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM variant_recipes WHERE variant_id = $1"
        ))
        .bind(variant_id)
        .fetch_optional(&self.db)
        .await?
        {
            Some(row) => row,
            None => {
                sqlx::query_as::<_, RecipeRow>(&format!(
                    r#"
                    INSERT INTO variant_recipes (variant_id, name, estimated_cost)
                    SELECT v.id, c.name || ' ' || v.size, 0
                    FROM coffee_variants v
                    INNER JOIN coffees c ON c.id = v.coffee_id
                    WHERE v.id = $1
                    RETURNING {RECIPE_COLUMNS}
                    "#
                ))
                .bind(variant_id)
                .fetch_one(&self.db)
                .await?
            }
        };

        let ingredients = self.associations(recipe.id).await?;
        Ok(RecipeDetail {
            recipe: recipe.into(),
            ingredients,
        })
    }

    /// Rename a recipe or change its serving size
    pub async fn update(&self, recipe_id: Uuid, input: RecipeUpdate) -> AppResult<Recipe> {
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Recipe name must not be empty".to_string(),
                    message_id: "Nama resep tidak boleh kosong".to_string(),
                });
            }
        }
        if let Some(serving_size) = input.serving_size {
            if serving_size <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "serving_size".to_string(),
                    message: "Serving size must be greater than zero".to_string(),
                    message_id: "Ukuran sajian harus lebih dari nol".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            r#"
            UPDATE variant_recipes
            SET name = COALESCE($2, name),
                serving_size = COALESCE($3, serving_size),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(recipe_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.serving_size)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        Ok(row.into())
    }

    /// Attach an ingredient to a recipe. The association cost is snapshotted
    /// from the ingredient's current unit cost and the recipe total is
    /// recomputed in the same transaction.
    pub async fn add_association(
        &self,
        recipe_id: Uuid,
        input: AssociationInput,
    ) -> AppResult<AssociationDetail> {
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be greater than zero".to_string(),
                message_id: "Jumlah harus lebih dari nol".to_string(),
            });
        }

        let recipe_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM variant_recipes WHERE id = $1)",
        )
        .bind(recipe_id)
        .fetch_one(&self.db)
        .await?;
        if !recipe_exists {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        let cost_per_unit = sqlx::query_scalar::<_, Decimal>(
            "SELECT cost_per_unit FROM ingredients WHERE id = $1",
        )
        .bind(input.ingredient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM recipe_ingredients \
             WHERE recipe_id = $1 AND ingredient_id = $2)",
        )
        .bind(recipe_id)
        .bind(input.ingredient_id)
        .fetch_one(&self.db)
        .await?;
        if duplicate {
            return Err(AppError::DuplicateEntry("ingredient_id".to_string()));
        }

        let cost = association_cost(input.quantity, cost_per_unit);

        let mut tx = self.db.begin().await?;
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, cost, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(recipe_id)
        .bind(input.ingredient_id)
        .bind(input.quantity)
        .bind(cost)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        CostingService::recalculate_recipe_on(&mut tx, recipe_id)
            .await
            .map_err(as_propagation_failure)?;
        tx.commit().await?;

        self.association_detail(id).await
    }

    /// Change an association's quantity or notes. Cost is re-derived from
    /// the ingredient's current unit cost.
    pub async fn update_association(
        &self,
        association_id: Uuid,
        input: AssociationUpdate,
    ) -> AppResult<AssociationDetail> {
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be greater than zero".to_string(),
                message_id: "Jumlah harus lebih dari nol".to_string(),
            });
        }

        let (recipe_id, cost_per_unit) = sqlx::query_as::<_, (Uuid, Decimal)>(
            r#"
            SELECT ri.recipe_id, i.cost_per_unit
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.id = $1
            "#,
        )
        .bind(association_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe ingredient".to_string()))?;

        let cost = association_cost(input.quantity, cost_per_unit);

        let mut tx = self.db.begin().await?;
        sqlx::query(
            "UPDATE recipe_ingredients SET quantity = $2, cost = $3, notes = $4 WHERE id = $1",
        )
        .bind(association_id)
        .bind(input.quantity)
        .bind(cost)
        .bind(&input.notes)
        .execute(&mut *tx)
        .await?;

        CostingService::recalculate_recipe_on(&mut tx, recipe_id)
            .await
            .map_err(as_propagation_failure)?;
        tx.commit().await?;

        self.association_detail(association_id).await
    }

    /// Detach an ingredient and recompute the recipe total, so the stored
    /// estimated cost never keeps the removed ingredient's share.
    pub async fn remove_association(&self, association_id: Uuid) -> AppResult<()> {
        let recipe_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT recipe_id FROM recipe_ingredients WHERE id = $1",
        )
        .bind(association_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe ingredient".to_string()))?;

        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM recipe_ingredients WHERE id = $1")
            .bind(association_id)
            .execute(&mut *tx)
            .await?;

        CostingService::recalculate_recipe_on(&mut tx, recipe_id)
            .await
            .map_err(as_propagation_failure)?;
        tx.commit().await?;
        Ok(())
    }

    async fn associations(&self, recipe_id: Uuid) -> AppResult<Vec<AssociationDetail>> {
        let rows = sqlx::query_as::<_, AssociationDetail>(
            r#"
            SELECT ri.id, ri.recipe_id, ri.ingredient_id,
                   i.name AS ingredient_name, i.unit AS ingredient_unit,
                   i.cost_per_unit, ri.quantity, ri.cost, ri.notes
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn association_detail(&self, id: Uuid) -> AppResult<AssociationDetail> {
        sqlx::query_as::<_, AssociationDetail>(
            r#"
            SELECT ri.id, ri.recipe_id, ri.ingredient_id,
                   i.name AS ingredient_name, i.unit AS ingredient_unit,
                   i.cost_per_unit, ri.quantity, ri.cost, ri.notes
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe ingredient".to_string()))
    }
}
