//! Analytics tests
//!
//! Covers the profitability ladder, growth and average calculations.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::types::{classify_profitability, ProfitabilityStatus, ProfitabilityThresholds};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Ladder boundaries are strict: exactly-at-threshold falls one rung down
    #[test]
    fn ladder_boundaries_are_exclusive() {
        let t = ProfitabilityThresholds::default();

        assert_eq!(classify_profitability(dec("30.01"), &t), ProfitabilityStatus::Excellent);
        assert_eq!(classify_profitability(dec("30"), &t), ProfitabilityStatus::Good);
        assert_eq!(classify_profitability(dec("20"), &t), ProfitabilityStatus::Average);
        assert_eq!(classify_profitability(dec("10"), &t), ProfitabilityStatus::Poor);
        assert_eq!(classify_profitability(dec("0.01"), &t), ProfitabilityStatus::Poor);
        assert_eq!(classify_profitability(dec("0"), &t), ProfitabilityStatus::Loss);
        assert_eq!(classify_profitability(dec("-5"), &t), ProfitabilityStatus::Loss);
    }

    /// Stores can run their own ladder
    #[test]
    fn custom_thresholds_shift_the_ladder() {
        let t = ProfitabilityThresholds {
            excellent: dec("50"),
            good: dec("35"),
            average: dec("15"),
        };

        assert_eq!(classify_profitability(dec("40"), &t), ProfitabilityStatus::Good);
        assert_eq!(classify_profitability(dec("51"), &t), ProfitabilityStatus::Excellent);
        assert_eq!(classify_profitability(dec("20"), &t), ProfitabilityStatus::Average);
    }

    /// The 85.936% milk-scenario variant classifies as excellent
    #[test]
    fn milk_scenario_is_excellent() {
        let t = ProfitabilityThresholds::default();
        assert_eq!(
            classify_profitability(dec("85.936"), &t),
            ProfitabilityStatus::Excellent
        );
    }

    /// Growth against a zero previous period reports zero, not an error
    #[test]
    fn growth_guards_zero_denominator() {
        let previous = Decimal::ZERO;
        let current = dec("150000");
        let growth = if previous > Decimal::ZERO {
            (current - previous) / previous * Decimal::from(100)
        } else {
            Decimal::ZERO
        };
        assert_eq!(growth, Decimal::ZERO);
    }

    #[test]
    fn growth_is_relative_to_previous_period() {
        let previous = dec("100000");
        let current = dec("150000");
        let growth = (current - previous) / previous * Decimal::from(100);
        assert_eq!(growth, dec("50"));
    }

    /// Average order value with no orders is zero
    #[test]
    fn average_order_value_guards_empty_period() {
        let total_revenue = Decimal::ZERO;
        let total_orders = 0i64;
        let average = if total_orders > 0 {
            total_revenue / Decimal::from(total_orders)
        } else {
            Decimal::ZERO
        };
        assert_eq!(average, Decimal::ZERO);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000i64..100_000).prop_map(|n| Decimal::from(n) / Decimal::from(100))
}

proptest! {
    /// Every percentage gets exactly one classification
    #[test]
    fn classification_is_total(pct in percentage_strategy()) {
        let t = ProfitabilityThresholds::default();
        let status = classify_profitability(pct, &t);

        let expected = if pct > dec("30") {
            ProfitabilityStatus::Excellent
        } else if pct > dec("20") {
            ProfitabilityStatus::Good
        } else if pct > dec("10") {
            ProfitabilityStatus::Average
        } else if pct > Decimal::ZERO {
            ProfitabilityStatus::Poor
        } else {
            ProfitabilityStatus::Loss
        };
        prop_assert_eq!(status, expected);
    }

    /// Classification is monotone: a higher margin never ranks worse
    #[test]
    fn classification_is_monotone(a in percentage_strategy(), b in percentage_strategy()) {
        fn rank(s: ProfitabilityStatus) -> u8 {
            match s {
                ProfitabilityStatus::Loss => 0,
                ProfitabilityStatus::Poor => 1,
                ProfitabilityStatus::Average => 2,
                ProfitabilityStatus::Good => 3,
                ProfitabilityStatus::Excellent => 4,
            }
        }

        let t = ProfitabilityThresholds::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            rank(classify_profitability(low, &t)) <= rank(classify_profitability(high, &t))
        );
    }
}
