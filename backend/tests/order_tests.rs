//! Order lifecycle tests
//!
//! Covers total arithmetic, status handling and the completed-order lock.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{item_subtotal, order_total};
use shared::types::{OrderStatus, PaymentMethod};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn subtotal_scales_with_quantity() {
        assert_eq!(item_subtotal(dec("25000"), 2), dec("50000"));
        assert_eq!(item_subtotal(dec("18000"), 1), dec("18000"));
    }

    #[test]
    fn total_is_items_plus_fees() {
        let items = [
            item_subtotal(dec("25000"), 2),
            item_subtotal(dec("18000"), 1),
        ];
        let fees = [dec("2000")];
        assert_eq!(order_total(&items, &fees), dec("70000"));
    }

    #[test]
    fn fee_free_total_is_item_sum() {
        let items = [item_subtotal(dec("25000"), 3)];
        assert_eq!(order_total(&items, &[]), dec("75000"));
    }

    #[test]
    fn only_completed_orders_lock_items() {
        assert!(OrderStatus::Completed.locks_items());
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Cancelled,
        ] {
            assert!(!status.locks_items(), "{:?} should stay editable", status);
        }
    }

    #[test]
    fn status_strings_round_trip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn payment_methods_round_trip() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Transfer
        );
        assert!("credit_card".parse::<PaymentMethod>().is_err());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (100u64..10_000_000).prop_map(Decimal::from)
}

fn fee_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..100_000).prop_map(Decimal::from)
}

proptest! {
    /// An order total never drops below the sum of its items
    #[test]
    fn fees_never_reduce_the_total(
        prices in proptest::collection::vec(price_strategy(), 1..6),
        quantities in proptest::collection::vec(1i32..20, 1..6),
        fees in proptest::collection::vec(fee_strategy(), 0..3),
    ) {
        let subtotals: Vec<Decimal> = prices
            .iter()
            .zip(quantities.iter())
            .map(|(p, q)| item_subtotal(*p, *q))
            .collect();
        let item_sum: Decimal = subtotals.iter().copied().sum();
        let total = order_total(&subtotals, &fees);

        prop_assert!(total >= item_sum);
        prop_assert_eq!(total - item_sum, fees.iter().copied().sum());
    }

    /// Subtotals are linear in quantity
    #[test]
    fn subtotal_is_linear(price in price_strategy(), quantity in 1i32..50) {
        let one = item_subtotal(price, 1);
        let many = item_subtotal(price, quantity);
        prop_assert_eq!(many, one * Decimal::from(quantity));
    }
}
