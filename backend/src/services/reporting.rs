//! Sales reporting: date-range breakdowns and the order CSV export.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Aggregated sales report over a date range
#[derive(Debug, Serialize)]
pub struct SalesReport {
    pub range: DateRange,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub average_order_value: Decimal,
    pub by_status: Vec<StatusBreakdown>,
    pub by_payment_method: Vec<PaymentBreakdown>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StatusBreakdown {
    pub status: String,
    pub order_count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct PaymentBreakdown {
    pub payment_method: String,
    pub order_count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, FromRow)]
struct ExportRow {
    order_id: Uuid,
    order_number: String,
    created_at: DateTime<Utc>,
    customer_name: String,
    customer_phone: String,
    coffee_name: String,
    variant_size: String,
    quantity: i32,
    price: Decimal,
    subtotal: Decimal,
    total_amount: Decimal,
    customer_notes: Option<String>,
    status: String,
    payment_method: String,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Sales report between two inclusive dates. Cancelled orders appear in
    /// the status breakdown but never count toward revenue totals.
    pub async fn sales_report(&self, start: NaiveDate, end: NaiveDate) -> AppResult<SalesReport> {
        if end < start {
            return Err(AppError::ValidationError(
                "end date must not be before start date".to_string(),
            ));
        }

        let (total_revenue, total_orders) = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM orders
            WHERE status <> 'cancelled'
              AND created_at::date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        let by_status = sqlx::query_as::<_, StatusBreakdown>(
            r#"
            SELECT status, COUNT(*) AS order_count, COALESCE(SUM(total_amount), 0) AS revenue
            FROM orders
            WHERE created_at::date BETWEEN $1 AND $2
            GROUP BY status
            ORDER BY order_count DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let by_payment_method = sqlx::query_as::<_, PaymentBreakdown>(
            r#"
            SELECT payment_method, COUNT(*) AS order_count,
                   COALESCE(SUM(total_amount), 0) AS revenue
            FROM orders
            WHERE status <> 'cancelled'
              AND created_at::date BETWEEN $1 AND $2
            GROUP BY payment_method
            ORDER BY revenue DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let average_order_value = if total_orders > 0 {
            total_revenue / Decimal::from(total_orders)
        } else {
            Decimal::ZERO
        };

        Ok(SalesReport {
            range: DateRange { start, end },
            total_revenue,
            total_orders,
            average_order_value,
            by_status,
            by_payment_method,
        })
    }

    /// Export orders in a date range as CSV, one row per order line. Orders
    /// with several items repeat the order columns on each of their rows.
    pub async fn export_orders_csv(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<u8>> {
        if end < start {
            return Err(AppError::ValidationError(
                "end date must not be before start date".to_string(),
            ));
        }

        let rows = sqlx::query_as::<_, ExportRow>(
            r#"
            SELECT o.id AS order_id, o.order_number, o.created_at,
                   o.customer_name, o.customer_phone,
                   i.coffee_name, i.variant_size, i.quantity, i.price, i.subtotal,
                   o.total_amount, o.customer_notes, o.status, o.payment_method
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            WHERE o.created_at::date BETWEEN $1 AND $2
            ORDER BY o.created_at, o.id, i.coffee_name, i.variant_size
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "Order ID",
                "Order Number",
                "Date",
                "Customer Name",
                "Customer Phone",
                "Product",
                "Variant",
                "Quantity",
                "Unit Price",
                "Item Subtotal",
                "Order Total",
                "Customer Notes",
                "Status",
                "Payment Method",
            ])
            .map_err(|e| AppError::Internal(e.to_string()))?;

        for row in &rows {
            writer
                .write_record([
                    row.order_id.to_string(),
                    row.order_number.clone(),
                    row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    row.customer_name.clone(),
                    row.customer_phone.clone(),
                    row.coffee_name.clone(),
                    row.variant_size.clone(),
                    row.quantity.to_string(),
                    row.price.to_string(),
                    row.subtotal.to_string(),
                    row.total_amount.to_string(),
                    row.customer_notes.clone().unwrap_or_default(),
                    row.status.clone(),
                    row.payment_method.clone(),
                ])
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
