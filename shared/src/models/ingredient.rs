//! Ingredient inventory models and package costing

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grouping for ingredients (e.g. dairy, syrups, beans)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Hex color used by the admin UI
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A raw material tracked for stock and recipe costing.
///
/// With package-based costing enabled, `cost_per_unit` is derived as
/// `package_price / package_size` rounded to two decimals; otherwise it is
/// set directly by the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unit of measure (ml, g, pcs, ...)
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub supplier: Option<String>,
    pub category_id: Uuid,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub is_active: bool,
    pub package_size: Option<Decimal>,
    pub package_price: Option<Decimal>,
    pub last_package_update: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Stock has fallen to or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }
}

/// Append-only log entry for an ingredient cost change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub change_reason: String,
    pub changed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Per-unit cost derived from a package purchase, rounded to two decimals.
///
/// Returns `None` unless both package size and price are strictly positive.
pub fn package_unit_cost(package_size: Decimal, package_price: Decimal) -> Option<Decimal> {
    if package_size > Decimal::ZERO && package_price > Decimal::ZERO {
        Some((package_price / package_size).round_dp(2))
    } else {
        None
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
    fn package_cost_rounds_to_two_decimals() {
        // 16700 / 950 = 17.5789... -> 17.58
        assert_eq!(
            package_unit_cost(dec("950"), dec("16700")),
            Some(dec("17.58"))
        );
    }

    #[test]
    fn package_cost_requires_positive_inputs() {
        assert_eq!(package_unit_cost(Decimal::ZERO, dec("16700")), None);
        assert_eq!(package_unit_cost(dec("950"), Decimal::ZERO), None);
        assert_eq!(package_unit_cost(dec("-1"), dec("10")), None);
    }
}
