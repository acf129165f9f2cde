//! Order lifecycle: storefront checkout, admin order management,
//! server-side totals and the completed-order lock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{item_subtotal, order_total, AdditionalFee, Order, OrderItem};
use shared::types::{OrderStatus, Pagination, PaginatedResponse, PaginationMeta, PaymentMethod};
use shared::validation::{validate_fee_amount, validate_phone, validate_positive_quantity};

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Checkout payload, shared by the storefront and manual admin orders
#[derive(Debug, Deserialize)]
pub struct OrderInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_notes: Option<String>,
    pub payment_method: String,
    pub pickup_time: Option<DateTime<Utc>>,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub additional_fees: Vec<FeeInput>,
}

/// One order line. With a `variant_id` the name, size and unit price come
/// from the catalog; without one (manual admin entry) they come from the
/// payload.
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub variant_id: Option<Uuid>,
    pub coffee_name: Option<String>,
    pub variant_size: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: i32,
    pub item_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeeInput {
    pub fee_name: String,
    pub fee_amount: Decimal,
}

/// Partial update for an existing order
#[derive(Debug, Deserialize)]
pub struct OrderUpdate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_notes: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub pickup_time: Option<DateTime<Utc>>,
    pub whatsapp_sent: Option<bool>,
    pub items: Option<Vec<OrderItemInput>>,
    pub additional_fees: Option<Vec<FeeInput>>,
}

/// Listing filters for the admin order table
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl OrderFilter {
    fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// An order with its lines and fees
#[derive(Debug, Serialize)]
pub struct OrderWithDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub additional_fees: Vec<AdditionalFee>,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    customer_name: String,
    customer_phone: String,
    customer_notes: Option<String>,
    total_amount: Decimal,
    status: String,
    payment_method: String,
    pickup_time: Option<DateTime<Utc>>,
    whatsapp_sent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|_| AppError::Internal(format!("bad order status: {}", self.status)))?;
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_| AppError::Internal(format!("bad payment method: {}", self.payment_method)))?;
        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_notes: self.customer_notes,
            total_amount: self.total_amount,
            status,
            payment_method,
            pickup_time: self.pickup_time,
            whatsapp_sent: self.whatsapp_sent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    coffee_id: Option<Uuid>,
    variant_id: Option<Uuid>,
    coffee_name: String,
    variant_size: String,
    price: Decimal,
    quantity: i32,
    subtotal: Decimal,
    item_notes: Option<String>,
}

#[derive(Debug, FromRow)]
struct FeeRow {
    id: Uuid,
    order_id: Uuid,
    fee_name: String,
    fee_amount: Decimal,
}

/// A fully resolved order line ready to insert
struct ResolvedItem {
    coffee_id: Option<Uuid>,
    variant_id: Option<Uuid>,
    coffee_name: String,
    variant_size: String,
    price: Decimal,
    quantity: i32,
    subtotal: Decimal,
    item_notes: Option<String>,
}

const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_phone, customer_notes, \
     total_amount, status, payment_method, pickup_time, whatsapp_sent, created_at, updated_at";

impl OrderService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order. Unit prices for catalog items are read from the
    /// variant row and the total is computed here, never taken from the
    /// client.
    pub async fn create(&self, input: OrderInput) -> AppResult<OrderWithDetails> {
        Self::validate_input(&input)?;
        let payment_method = parse_payment(&input.payment_method)?;

        let mut tx = self.db.begin().await?;

        let mut resolved = Vec::with_capacity(input.items.len());
        for item in &input.items {
            resolved.push(Self::resolve_item(&mut tx, item).await?);
        }

        let subtotals: Vec<Decimal> = resolved.iter().map(|i| i.subtotal).collect();
        let fee_amounts: Vec<Decimal> = input.additional_fees.iter().map(|f| f.fee_amount).collect();
        let total = order_total(&subtotals, &fee_amounts);

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders
                (customer_name, customer_phone, customer_notes, total_amount,
                 status, payment_method, pickup_time, whatsapp_sent)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, FALSE)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(input.customer_name.trim())
        .bind(input.customer_phone.trim())
        .bind(&input.customer_notes)
        .bind(total)
        .bind(payment_method.as_str())
        .bind(input.pickup_time)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_items(&mut tx, order_row.id, &resolved).await?;
        Self::insert_fees(&mut tx, order_row.id, &input.additional_fees).await?;
        tx.commit().await?;

        tracing::info!(order_number = %order_row.order_number, "order created");
        self.get(order_row.id).await
    }

    /// Paginated order list, filterable by status and by a search over
    /// order number, customer name and phone. Newest first.
    pub async fn list(&self, filter: OrderFilter) -> AppResult<PaginatedResponse<OrderWithDetails>> {
        let status = match &filter.status {
            Some(s) => Some(parse_status(s)?),
            None => None,
        };
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let pagination = filter.pagination();
        let page = pagination.page.max(1);
        let per_page = pagination.per_page.clamp(1, 100);
        let offset = i64::from(page - 1) * i64::from(per_page);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR order_number ILIKE $2
                   OR customer_name ILIKE $2 OR customer_phone ILIKE $2)
            "#,
        )
        .bind(status.map(|s| s.as_str().to_string()))
        .bind(&search)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR order_number ILIKE $2
                   OR customer_name ILIKE $2 OR customer_phone ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(status.map(|s| s.as_str().to_string()))
        .bind(&search)
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            data.push(self.attach_details(row).await?);
        }

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, per_page, total),
        })
    }

    pub async fn get(&self, id: Uuid) -> AppResult<OrderWithDetails> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        self.attach_details(row).await
    }

    /// Update an order. Items and fees are replaceable until the order is
    /// completed; after that they are locked and only header fields like
    /// status remain editable.
    pub async fn update(&self, id: Uuid, input: OrderUpdate) -> AppResult<OrderWithDetails> {
        let current = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?
        .into_order()?;

        let wants_line_changes = input.items.is_some() || input.additional_fees.is_some();
        if wants_line_changes && current.status.locks_items() {
            return Err(AppError::CompletedOrderLocked);
        }

        let status = match &input.status {
            Some(s) => Some(parse_status(s)?),
            None => None,
        };
        let payment_method = match &input.payment_method {
            Some(p) => Some(parse_payment(p)?),
            None => None,
        };
        if let Some(phone) = &input.customer_phone {
            validate_phone(phone).map_err(|msg| AppError::Validation {
                field: "customer_phone".to_string(),
                message: msg.to_string(),
                message_id: "Nomor telepon tidak valid".to_string(),
            })?;
        }
        for item in input.items.iter().flatten() {
            validate_positive_quantity(Decimal::from(item.quantity))
                .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        }
        for fee in input.additional_fees.iter().flatten() {
            validate_fee_amount(fee.fee_amount)
                .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        }

        let mut tx = self.db.begin().await?;

        let mut total = current.total_amount;
        if let Some(items) = &input.items {
            if items.is_empty() {
                return Err(AppError::ValidationError(
                    "order must contain at least one item".to_string(),
                ));
            }
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(Self::resolve_item(&mut tx, item).await?);
            }
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_items(&mut tx, id, &resolved).await?;

            let fees = match &input.additional_fees {
                Some(fees) => fees.iter().map(|f| f.fee_amount).collect(),
                None => {
                    sqlx::query_scalar::<_, Decimal>(
                        "SELECT fee_amount FROM order_additional_fees WHERE order_id = $1",
                    )
                    .bind(id)
                    .fetch_all(&mut *tx)
                    .await?
                }
            };
            let subtotals: Vec<Decimal> = resolved.iter().map(|i| i.subtotal).collect();
            total = order_total(&subtotals, &fees);
        }
        if let Some(fees) = &input.additional_fees {
            sqlx::query("DELETE FROM order_additional_fees WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_fees(&mut tx, id, fees).await?;
            if input.items.is_none() {
                let subtotals = sqlx::query_scalar::<_, Decimal>(
                    "SELECT subtotal FROM order_items WHERE order_id = $1",
                )
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
                let fee_amounts: Vec<Decimal> = fees.iter().map(|f| f.fee_amount).collect();
                total = order_total(&subtotals, &fee_amounts);
            }
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET customer_name = COALESCE($2, customer_name),
                customer_phone = COALESCE($3, customer_phone),
                customer_notes = COALESCE($4, customer_notes),
                status = COALESCE($5, status),
                payment_method = COALESCE($6, payment_method),
                pickup_time = COALESCE($7, pickup_time),
                whatsapp_sent = COALESCE($8, whatsapp_sent),
                total_amount = $9,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.customer_name)
        .bind(&input.customer_phone)
        .bind(&input.customer_notes)
        .bind(status.map(|s| s.as_str().to_string()))
        .bind(payment_method.map(|p| p.as_str().to_string()))
        .bind(input.pickup_time)
        .bind(input.whatsapp_sent)
        .bind(total)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get(id).await
    }

    /// Hard delete; items and fees cascade
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }
        Ok(())
    }

    /// Flag that the WhatsApp handoff link was opened for this order
    pub async fn mark_whatsapp_sent(&self, id: Uuid) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE orders SET whatsapp_sent = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }
        Ok(())
    }

    async fn attach_details(&self, row: OrderRow) -> AppResult<OrderWithDetails> {
        let order = row.into_order()?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, order_id, coffee_id, variant_id, coffee_name, variant_size,
                   price, quantity, subtotal, item_notes
            FROM order_items WHERE order_id = $1 ORDER BY coffee_name, variant_size
            "#,
        )
        .bind(order.id)
        .fetch_all(&self.db)
        .await?;

        let fees = sqlx::query_as::<_, FeeRow>(
            "SELECT id, order_id, fee_name, fee_amount \
             FROM order_additional_fees WHERE order_id = $1 ORDER BY fee_name",
        )
        .bind(order.id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderWithDetails {
            order,
            items: items
                .into_iter()
                .map(|r| OrderItem {
                    id: r.id,
                    order_id: r.order_id,
                    coffee_id: r.coffee_id,
                    variant_id: r.variant_id,
                    coffee_name: r.coffee_name,
                    variant_size: r.variant_size,
                    price: r.price,
                    quantity: r.quantity,
                    subtotal: r.subtotal,
                    item_notes: r.item_notes,
                })
                .collect(),
            additional_fees: fees
                .into_iter()
                .map(|r| AdditionalFee {
                    id: r.id,
                    order_id: r.order_id,
                    fee_name: r.fee_name,
                    fee_amount: r.fee_amount,
                })
                .collect(),
        })
    }

    async fn resolve_item(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        item: &OrderItemInput,
    ) -> AppResult<ResolvedItem> {
        if item.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be greater than zero".to_string(),
                message_id: "Jumlah harus lebih dari nol".to_string(),
            });
        }

        match item.variant_id {
            Some(variant_id) => {
                let row = sqlx::query_as::<_, (Uuid, String, String, Decimal)>(
                    r#"
                    SELECT c.id, c.name, v.size, v.price
                    FROM coffee_variants v
                    INNER JOIN coffees c ON c.id = v.coffee_id
                    WHERE v.id = $1
                    "#,
                )
                .bind(variant_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Variant".to_string()))?;

                Ok(ResolvedItem {
                    coffee_id: Some(row.0),
                    variant_id: Some(variant_id),
                    coffee_name: row.1,
                    variant_size: row.2,
                    price: row.3,
                    quantity: item.quantity,
                    subtotal: item_subtotal(row.3, item.quantity),
                    item_notes: item.item_notes.clone(),
                })
            }
            None => {
                let coffee_name = item
                    .coffee_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| AppError::Validation {
                        field: "coffee_name".to_string(),
                        message: "Manual items need a name and a price".to_string(),
                        message_id: "Item manual membutuhkan nama dan harga".to_string(),
                    })?;
                let price = item.price.filter(|p| *p >= Decimal::ZERO).ok_or_else(|| {
                    AppError::Validation {
                        field: "price".to_string(),
                        message: "Manual items need a name and a price".to_string(),
                        message_id: "Item manual membutuhkan nama dan harga".to_string(),
                    }
                })?;

                Ok(ResolvedItem {
                    coffee_id: None,
                    variant_id: None,
                    coffee_name: coffee_name.to_string(),
                    variant_size: item.variant_size.clone().unwrap_or_else(|| "-".to_string()),
                    price,
                    quantity: item.quantity,
                    subtotal: item_subtotal(price, item.quantity),
                    item_notes: item.item_notes.clone(),
                })
            }
        }
    }

    async fn insert_items(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order_id: Uuid,
        items: &[ResolvedItem],
    ) -> AppResult<()> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items
                    (order_id, coffee_id, variant_id, coffee_name, variant_size,
                     price, quantity, subtotal, item_notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(order_id)
            .bind(item.coffee_id)
            .bind(item.variant_id)
            .bind(&item.coffee_name)
            .bind(&item.variant_size)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.subtotal)
            .bind(&item.item_notes)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn insert_fees(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order_id: Uuid,
        fees: &[FeeInput],
    ) -> AppResult<()> {
        for fee in fees {
            if fee.fee_name.trim().is_empty() || fee.fee_amount < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "additional_fees".to_string(),
                    message: "Fees need a name and a non-negative amount".to_string(),
                    message_id: "Biaya tambahan membutuhkan nama dan nilai tidak negatif"
                        .to_string(),
                });
            }
            sqlx::query(
                "INSERT INTO order_additional_fees (order_id, fee_name, fee_amount) \
                 VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(fee.fee_name.trim())
            .bind(fee.fee_amount)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    fn validate_input(input: &OrderInput) -> AppResult<()> {
        if input.customer_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "customer_name".to_string(),
                message: "Customer name is required".to_string(),
                message_id: "Nama pelanggan wajib diisi".to_string(),
            });
        }
        validate_phone(&input.customer_phone).map_err(|msg| AppError::Validation {
            field: "customer_phone".to_string(),
            message: msg.to_string(),
            message_id: "Nomor telepon tidak valid".to_string(),
        })?;
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Order must contain at least one item".to_string(),
                message_id: "Pesanan harus berisi minimal satu item".to_string(),
            });
        }
        for item in &input.items {
            validate_positive_quantity(Decimal::from(item.quantity)).map_err(|msg| {
                AppError::Validation {
                    field: "quantity".to_string(),
                    message: msg.to_string(),
                    message_id: "Jumlah harus lebih dari nol".to_string(),
                }
            })?;
        }
        for fee in &input.additional_fees {
            validate_fee_amount(fee.fee_amount).map_err(|msg| AppError::Validation {
                field: "fee_amount".to_string(),
                message: msg.to_string(),
                message_id: "Biaya tambahan tidak boleh negatif".to_string(),
            })?;
        }
        Ok(())
    }
}

fn parse_status(s: &str) -> AppResult<OrderStatus> {
    s.parse::<OrderStatus>()
        .map_err(|_| AppError::ValidationError(format!("unknown order status: {s}")))
}

fn parse_payment(s: &str) -> AppResult<PaymentMethod> {
    s.parse::<PaymentMethod>()
        .map_err(|_| AppError::ValidationError(format!("unknown payment method: {s}")))
}
