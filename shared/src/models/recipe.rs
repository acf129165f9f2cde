//! Recipe and recipe-ingredient association models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A variant's recipe. One recipe per sellable variant; `estimated_cost`
/// is the denormalized sum of its ingredient association costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub variant_id: Uuid,
    pub name: String,
    pub serving_size: Decimal,
    pub estimated_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cost of one recipe line at the ingredient's current per-unit cost.
pub fn association_cost(quantity: Decimal, cost_per_unit: Decimal) -> Decimal {
    quantity * cost_per_unit
}

/// Recipe cost is the plain sum of its line costs.
pub fn recipe_cost(line_costs: &[Decimal]) -> Decimal {
    line_costs.iter().copied().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn association_cost_is_quantity_times_unit_cost() {
        assert_eq!(association_cost(dec("200"), dec("17.58")), dec("3516.00"));
    }

    #[test]
    fn recipe_cost_sums_lines() {
        assert_eq!(
            recipe_cost(&[dec("3516.00"), dec("500"), dec("0.50")]),
            dec("4016.50")
        );
        assert_eq!(recipe_cost(&[]), Decimal::ZERO);
    }
}
