//! Recipe costing service
//!
//! Keeps the three-level denormalized cost chain consistent:
//! ingredient cost -> recipe-ingredient cost -> recipe estimated cost ->
//! variant cost/profit fields.
//!
//! The whole chain runs inside one database transaction. Either every
//! downstream record reflects the new ingredient cost or none do; a failure
//! rolls back and surfaces as `AppError::PropagationFailed` instead of being
//! silently logged away.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::ProfitBreakdown;

/// Costing service for cost propagation and recipe recalculation
#[derive(Clone)]
pub struct CostingService {
    db: PgPool,
}

/// What a propagation run touched
#[derive(Debug, Clone, Serialize)]
pub struct PropagationSummary {
    pub ingredient_id: Uuid,
    pub cost_per_unit: Decimal,
    pub associations_updated: u64,
    pub recipes_updated: Vec<Uuid>,
}

impl CostingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Re-derive every association, recipe and variant depending on the
    /// given ingredient from its current persisted `cost_per_unit`.
    ///
    /// Idempotent: running twice with no intervening writes leaves all
    /// values unchanged.
    pub async fn propagate_ingredient_cost(
        &self,
        ingredient_id: Uuid,
    ) -> AppResult<PropagationSummary> {
        let mut tx = self.db.begin().await?;
        let summary = Self::propagate_on(&mut tx, ingredient_id)
            .await
            .map_err(as_propagation_failure)?;
        tx.commit()
            .await
            .map_err(|e| AppError::PropagationFailed(e.to_string()))?;

        tracing::debug!(
            ingredient_id = %summary.ingredient_id,
            associations = summary.associations_updated,
            recipes = summary.recipes_updated.len(),
            "cost propagation committed"
        );
        Ok(summary)
    }

    /// Recompute one recipe's estimated cost and its variant's profit
    /// fields. Called after any association insert, update or delete.
    pub async fn recalculate_recipe(&self, recipe_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        Self::recalculate_recipe_on(&mut tx, recipe_id)
            .await
            .map_err(as_propagation_failure)?;
        tx.commit()
            .await
            .map_err(|e| AppError::PropagationFailed(e.to_string()))?;
        Ok(())
    }

    /// Transaction-scoped propagation, for callers that already hold a
    /// transaction (the ingredient write path runs its own write, the
    /// price-history append, and this chain atomically).
    pub async fn propagate_on(
        conn: &mut PgConnection,
        ingredient_id: Uuid,
    ) -> AppResult<PropagationSummary> {
        let cost_per_unit = sqlx::query_scalar::<_, Decimal>(
            "SELECT cost_per_unit FROM ingredients WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        // Re-derive every association cost from the new unit cost and
        // collect the affected recipes in one pass.
        let touched_recipes = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE recipe_ingredients
            SET cost = quantity * $2
            WHERE ingredient_id = $1
            RETURNING recipe_id
            "#,
        )
        .bind(ingredient_id)
        .bind(cost_per_unit)
        .fetch_all(&mut *conn)
        .await?;

        let associations_updated = touched_recipes.len() as u64;

        let mut recipes_updated = Vec::new();
        for recipe_id in touched_recipes {
            if !recipes_updated.contains(&recipe_id) {
                recipes_updated.push(recipe_id);
            }
        }

        for recipe_id in &recipes_updated {
            Self::recalculate_recipe_on(conn, *recipe_id).await?;
        }

        Ok(PropagationSummary {
            ingredient_id,
            cost_per_unit,
            associations_updated,
            recipes_updated,
        })
    }

    /// Transaction-scoped single-recipe recalculation: re-sum association
    /// costs into `estimated_cost`, then refresh the variant's denormalized
    /// profit fields from its current price.
    pub async fn recalculate_recipe_on(
        conn: &mut PgConnection,
        recipe_id: Uuid,
    ) -> AppResult<()> {
        let estimated_cost = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(cost), 0) FROM recipe_ingredients WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&mut *conn)
        .await?;

        let variant_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE variant_recipes
            SET estimated_cost = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING variant_id
            "#,
        )
        .bind(recipe_id)
        .bind(estimated_cost)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        let price = sqlx::query_scalar::<_, Decimal>(
            "SELECT price FROM coffee_variants WHERE id = $1",
        )
        .bind(variant_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Variant".to_string()))?;

        let profit = ProfitBreakdown::from_price_and_cost(price, estimated_cost);

        sqlx::query(
            r#"
            UPDATE coffee_variants
            SET cost_price = $2, profit_amount = $3, profit_percentage = $4
            WHERE id = $1
            "#,
        )
        .bind(variant_id)
        .bind(profit.cost_price)
        .bind(profit.profit_amount)
        .bind(profit.profit_percentage)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// Database failures inside the propagation chain surface under their own
/// error code; validation/not-found errors pass through untouched.
pub(crate) fn as_propagation_failure(err: AppError) -> AppError {
    match err {
        AppError::DatabaseError(e) => AppError::PropagationFailed(e.to_string()),
        other => other,
    }
}
