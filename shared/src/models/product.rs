//! Sellable product models and variant profitability math

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A menu item (e.g. "Kopi Susu Gula Aren")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coffee {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub best_seller: bool,
    pub created_at: DateTime<Utc>,
}

/// A sellable SKU of a coffee: one size at one price.
///
/// `cost_price`, `profit_amount` and `profit_percentage` are denormalized
/// from the variant's recipe for fast reads; the costing service keeps them
/// consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeVariant {
    pub id: Uuid,
    pub coffee_id: Uuid,
    pub size: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub cost_price: Decimal,
    pub profit_amount: Decimal,
    pub profit_percentage: Decimal,
    pub stock: i32,
    pub available: bool,
}

impl CoffeeVariant {
    /// Storefront availability: flagged available AND in stock.
    pub fn is_sellable(&self) -> bool {
        self.available && self.stock > 0
    }
}

/// Denormalized profitability fields derived from price and recipe cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub cost_price: Decimal,
    pub profit_amount: Decimal,
    pub profit_percentage: Decimal,
}

impl ProfitBreakdown {
    /// Compute the chain `profit = price - cost`,
    /// `percentage = profit / price * 100` with the zero-price guard:
    /// a free item reports 0%, never a division error or NaN.
    pub fn from_price_and_cost(price: Decimal, cost_price: Decimal) -> Self {
        let profit_amount = price - cost_price;
        let profit_percentage = if price > Decimal::ZERO {
            profit_amount / price * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        Self {
            cost_price,
            profit_amount,
            profit_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn profit_chain_holds() {
        let b = ProfitBreakdown::from_price_and_cost(dec("25000"), dec("3516.00"));
        assert_eq!(b.profit_amount, dec("21484.00"));
        assert_eq!(b.profit_percentage, dec("85.936"));
    }

    #[test]
    fn zero_price_reports_zero_percentage() {
        let b = ProfitBreakdown::from_price_and_cost(Decimal::ZERO, dec("1000"));
        assert_eq!(b.profit_amount, dec("-1000"));
        assert_eq!(b.profit_percentage, Decimal::ZERO);
    }

    #[test]
    fn loss_making_variant_has_negative_percentage() {
        let b = ProfitBreakdown::from_price_and_cost(dec("1000"), dec("1500"));
        assert_eq!(b.profit_amount, dec("-500"));
        assert_eq!(b.profit_percentage, dec("-50"));
    }
}
