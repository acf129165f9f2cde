//! Order models and total arithmetic

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{OrderStatus, PaymentMethod};

/// A customer order. Immutable once `completed` (items and fees locked);
/// `total_amount` satisfies `sum(item.subtotal) + sum(fee.fee_amount)` at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_notes: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub pickup_time: Option<DateTime<Utc>>,
    pub whatsapp_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order. Product name/size/price are denormalized at order
/// time so later catalog edits never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub coffee_id: Option<Uuid>,
    pub variant_id: Option<Uuid>,
    pub coffee_name: String,
    pub variant_size: String,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub item_notes: Option<String>,
}

/// Extra charge attached to an order (packaging, delivery, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalFee {
    pub id: Uuid,
    pub order_id: Uuid,
    pub fee_name: String,
    pub fee_amount: Decimal,
}

/// Line subtotal: unit price times quantity.
pub fn item_subtotal(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Order total: item subtotals plus additional fees.
pub fn order_total(item_subtotals: &[Decimal], fee_amounts: &[Decimal]) -> Decimal {
    item_subtotals.iter().copied().sum::<Decimal>() + fee_amounts.iter().copied().sum::<Decimal>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn total_is_items_plus_fees() {
        let items = [dec("50000"), dec("18000")];
        let fees = [dec("2000"), Decimal::ZERO];
        assert_eq!(order_total(&items, &fees), dec("70000"));
    }

    #[test]
    fn total_without_fees_is_item_sum() {
        assert_eq!(
            order_total(&[item_subtotal(dec("25000"), 2)], &[]),
            dec("50000")
        );
    }
}
