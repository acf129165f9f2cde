//! Recipe costing tests
//!
//! Covers the cost chain from package pricing through association costs,
//! recipe totals and variant profit fields.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{association_cost, package_unit_cost, recipe_cost, ProfitBreakdown};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 950ml of milk at Rp16.700 costs 17.58/ml after rounding
    #[test]
    fn package_unit_cost_rounds_to_two_decimals() {
        assert_eq!(package_unit_cost(dec("950"), dec("16700")), Some(dec("17.58")));
    }

    #[test]
    fn package_unit_cost_rejects_non_positive_packages() {
        assert_eq!(package_unit_cost(dec("0"), dec("16700")), None);
        assert_eq!(package_unit_cost(dec("950"), dec("0")), None);
        assert_eq!(package_unit_cost(dec("-1"), dec("100")), None);
    }

    #[test]
    fn association_cost_is_quantity_times_unit_cost() {
        assert_eq!(association_cost(dec("200"), dec("17.58")), dec("3516.00"));
        assert_eq!(association_cost(dec("0.5"), dec("17.58")), dec("8.790"));
    }

    #[test]
    fn recipe_cost_sums_association_costs() {
        let costs = [dec("3516.00"), dec("1200"), dec("350.25")];
        assert_eq!(recipe_cost(&costs), dec("5066.25"));
    }

    #[test]
    fn empty_recipe_costs_nothing() {
        assert_eq!(recipe_cost(&[]), Decimal::ZERO);
    }

    /// The full chain from the milk package to the variant profit fields
    #[test]
    fn milk_package_to_variant_profit() {
        let unit_cost = package_unit_cost(dec("950"), dec("16700")).unwrap();
        let milk_cost = association_cost(dec("200"), unit_cost);
        let estimated = recipe_cost(&[milk_cost]);
        let profit = ProfitBreakdown::from_price_and_cost(dec("25000"), estimated);

        assert_eq!(unit_cost, dec("17.58"));
        assert_eq!(estimated, dec("3516.00"));
        assert_eq!(profit.profit_amount, dec("21484.00"));
        assert_eq!(profit.profit_percentage, dec("85.936"));
    }

    /// Changing a shared ingredient reprices every recipe that uses it
    #[test]
    fn shared_ingredient_change_fans_out() {
        let old_unit = dec("17.58");
        let new_unit = package_unit_cost(dec("1000"), dec("19000")).unwrap();
        assert_eq!(new_unit, dec("19.00"));

        // Recipe A: 200ml milk + fixed 1000 of coffee
        // Recipe B: 150ml milk only
        let recipe_a_old = recipe_cost(&[association_cost(dec("200"), old_unit), dec("1000")]);
        let recipe_b_old = recipe_cost(&[association_cost(dec("150"), old_unit)]);

        let recipe_a_new = recipe_cost(&[association_cost(dec("200"), new_unit), dec("1000")]);
        let recipe_b_new = recipe_cost(&[association_cost(dec("150"), new_unit)]);

        assert_eq!(recipe_a_old, dec("4516.00"));
        assert_eq!(recipe_b_old, dec("2637.00"));
        assert_eq!(recipe_a_new, dec("4800.00"));
        assert_eq!(recipe_b_new, dec("2850.00"));
    }

    /// Removing an association drops its share immediately
    #[test]
    fn removed_association_leaves_no_residue() {
        let milk = association_cost(dec("200"), dec("17.58"));
        let sugar = association_cost(dec("15"), dec("20"));

        let with_sugar = recipe_cost(&[milk, sugar]);
        let without_sugar = recipe_cost(&[milk]);

        assert_eq!(with_sugar - without_sugar, sugar);
        assert_eq!(without_sugar, dec("3516.00"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn money_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000).prop_map(|n| Decimal::from(n) / Decimal::from(100))
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..100_000).prop_map(|n| Decimal::from(n) / Decimal::from(100))
}

proptest! {
    /// Re-deriving the chain with unchanged inputs changes nothing
    #[test]
    fn propagation_is_idempotent(
        quantity in quantity_strategy(),
        unit_cost in money_strategy(),
        price in money_strategy(),
    ) {
        let first_cost = association_cost(quantity, unit_cost);
        let first_total = recipe_cost(&[first_cost]);
        let first_profit = ProfitBreakdown::from_price_and_cost(price, first_total);

        let second_cost = association_cost(quantity, unit_cost);
        let second_total = recipe_cost(&[second_cost]);
        let second_profit = ProfitBreakdown::from_price_and_cost(price, second_total);

        prop_assert_eq!(first_cost, second_cost);
        prop_assert_eq!(first_total, second_total);
        prop_assert_eq!(first_profit, second_profit);
    }

    /// price = cost + profit always holds
    #[test]
    fn profit_chain_is_consistent(price in money_strategy(), cost in money_strategy()) {
        let profit = ProfitBreakdown::from_price_and_cost(price, cost);
        prop_assert_eq!(profit.cost_price + profit.profit_amount, price);
    }

    /// Positive price and cost below price means positive profit percentage
    #[test]
    fn profitable_variant_has_positive_percentage(
        price in money_strategy(),
        cost in money_strategy(),
    ) {
        prop_assume!(cost < price);
        let profit = ProfitBreakdown::from_price_and_cost(price, cost);
        prop_assert!(profit.profit_percentage > Decimal::ZERO);
        prop_assert!(profit.profit_percentage <= Decimal::from(100));
    }

    /// Package unit cost is derived from positive packages only, at 2dp
    #[test]
    fn package_unit_cost_scale_is_bounded(
        size in quantity_strategy(),
        price in money_strategy(),
    ) {
        let unit = package_unit_cost(size, price);
        prop_assert!(unit.is_some());
        prop_assert!(unit.unwrap().scale() <= 2);
    }

    /// A recipe total is the sum of its parts, in any order
    #[test]
    fn recipe_cost_is_order_independent(
        costs in proptest::collection::vec(money_strategy(), 0..8),
    ) {
        let mut reversed = costs.clone();
        reversed.reverse();
        prop_assert_eq!(recipe_cost(&costs), recipe_cost(&reversed));
    }
}
