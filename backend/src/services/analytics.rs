//! Sales analytics for the admin dashboard: revenue summary, period
//! buckets, per-variant profitability and best sellers.
//!
//! Only completed orders count toward revenue and profit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use shared::types::{
    classify_profitability, ProfitabilityStatus, ProfitabilityThresholds, ReportPeriod,
};

/// Analytics service. Profitability thresholds come from configuration so
/// each store can set its own ladder.
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
    thresholds: ProfitabilityThresholds,
}

/// Headline dashboard numbers
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub total_profit: Decimal,
    pub profit_margin: Decimal,
    pub average_order_value: Decimal,
    pub today_revenue: Decimal,
    pub today_orders: i64,
    pub yesterday_revenue: Decimal,
    pub revenue_growth_percentage: Decimal,
    pub pending_orders: i64,
}

/// One time bucket of revenue
#[derive(Debug, Serialize, FromRow)]
pub struct PeriodBucket {
    pub bucket: NaiveDate,
    pub revenue: Decimal,
    pub order_count: i64,
}

/// Per-variant profitability with its ladder classification
#[derive(Debug, Serialize)]
pub struct VariantProfitability {
    pub variant_id: Uuid,
    pub coffee_name: String,
    pub variant_size: String,
    pub price: Decimal,
    pub cost_price: Decimal,
    pub profit_amount: Decimal,
    pub profit_percentage: Decimal,
    pub status: ProfitabilityStatus,
}

/// One best-seller row
#[derive(Debug, Serialize, FromRow)]
pub struct TopProduct {
    pub coffee_name: String,
    pub variant_size: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, FromRow)]
struct ProfitabilityRow {
    variant_id: Uuid,
    coffee_name: String,
    variant_size: String,
    price: Decimal,
    cost_price: Decimal,
    profit_amount: Decimal,
    profit_percentage: Decimal,
}

impl AnalyticsService {
    pub fn new(db: PgPool, thresholds: ProfitabilityThresholds) -> Self {
        Self { db, thresholds }
    }

    /// Dashboard summary. Profit margin, average order value and day-over-day
    /// growth all guard their zero denominators and report 0 instead of
    /// failing.
    pub async fn summary(&self) -> AppResult<AnalyticsSummary> {
        let (total_revenue, total_orders) = self.revenue_between(None, None).await?;

        // Manual order lines have no variant, so their cost is taken as zero
        // and the whole line counts as profit.
        let total_profit = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM((i.price - COALESCE(v.cost_price, 0)) * i.quantity), 0)
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            LEFT JOIN coffee_variants v ON v.id = i.variant_id
            WHERE o.status = 'completed'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let (today_revenue, today_orders) = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM orders
            WHERE status = 'completed' AND created_at::date = CURRENT_DATE
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let yesterday_revenue = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM orders
            WHERE status = 'completed'
              AND created_at::date = CURRENT_DATE - INTERVAL '1 day'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let pending_orders = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE status = 'pending'",
        )
        .fetch_one(&self.db)
        .await?;

        let profit_margin = if total_revenue > Decimal::ZERO {
            total_profit / total_revenue * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        let average_order_value = if total_orders > 0 {
            total_revenue / Decimal::from(total_orders)
        } else {
            Decimal::ZERO
        };
        let revenue_growth_percentage = if yesterday_revenue > Decimal::ZERO {
            (today_revenue - yesterday_revenue) / yesterday_revenue * Decimal::from(100)
        } else {
            Decimal::ZERO
        };

        Ok(AnalyticsSummary {
            total_revenue,
            total_orders,
            total_profit,
            profit_margin,
            average_order_value,
            today_revenue,
            today_orders,
            yesterday_revenue,
            revenue_growth_percentage,
            pending_orders,
        })
    }

    /// Revenue bucketed by day, month or year over an optional date range.
    /// Buckets with no orders are simply absent.
    pub async fn sales_by_period(
        &self,
        period: ReportPeriod,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<PeriodBucket>> {
        let unit = match period {
            ReportPeriod::Daily => "day",
            ReportPeriod::Monthly => "month",
            ReportPeriod::Yearly => "year",
        };

        let rows = sqlx::query_as::<_, PeriodBucket>(&format!(
            r#"
            SELECT date_trunc('{unit}', created_at)::date AS bucket,
                   COALESCE(SUM(total_amount), 0) AS revenue,
                   COUNT(*) AS order_count
            FROM orders
            WHERE status = 'completed'
              AND ($1::date IS NULL OR created_at::date >= $1)
              AND ($2::date IS NULL OR created_at::date <= $2)
            GROUP BY bucket
            ORDER BY bucket
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    /// Every variant with its denormalized profit fields, classified on the
    /// configured ladder, least profitable first.
    pub async fn profitability(&self) -> AppResult<Vec<VariantProfitability>> {
        let rows = sqlx::query_as::<_, ProfitabilityRow>(
            r#"
            SELECT v.id AS variant_id, c.name AS coffee_name, v.size AS variant_size,
                   v.price, v.cost_price, v.profit_amount, v.profit_percentage
            FROM coffee_variants v
            INNER JOIN coffees c ON c.id = v.coffee_id
            ORDER BY v.profit_percentage ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VariantProfitability {
                status: classify_profitability(r.profit_percentage, &self.thresholds),
                variant_id: r.variant_id,
                coffee_name: r.coffee_name,
                variant_size: r.variant_size,
                price: r.price,
                cost_price: r.cost_price,
                profit_amount: r.profit_amount,
                profit_percentage: r.profit_percentage,
            })
            .collect())
    }

    /// Best sellers by units sold across completed orders
    pub async fn top_products(&self, limit: i64) -> AppResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT i.coffee_name, i.variant_size,
                   SUM(i.quantity)::bigint AS quantity_sold,
                   COALESCE(SUM(i.subtotal), 0) AS revenue
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            WHERE o.status = 'completed'
            GROUP BY i.coffee_name, i.variant_size
            ORDER BY quantity_sold DESC, revenue DESC
            LIMIT $1
            "#,
        )
        .bind(limit.clamp(1, 50))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn revenue_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<(Decimal, i64)> {
        let row = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM orders
            WHERE status = 'completed'
              AND ($1::date IS NULL OR created_at::date >= $1)
              AND ($2::date IS NULL OR created_at::date <= $2)
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
