//! Property-based tests for order totals and price snapshots
//!
//! These use proptest to check the total invariant over randomly generated
//! line sets: the stored total is always the rounded sum of the snapshots,
//! and nothing about the computation depends on line order.

use mini_commerce::order::{Order, OrderItem, OrderStatus, total_of};
use mini_commerce::types::{Price, Timestamp};
use proptest::prelude::*;
use rust_decimal::Decimal;

// PROPERTY TEST STRATEGIES

/// Strategy for prices between 0.01 and 10_000.00, two decimal places
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for order lines with positive quantities
fn item_strategy() -> impl Strategy<Value = OrderItem> {
    (price_strategy(), 1u32..=50, "[a-z0-9]{10}").prop_map(|(price, quantity, suffix)| OrderItem {
        product_id: format!("prod_{suffix}"),
        quantity,
        price: Price::new(price),
    })
}

fn items_strategy() -> impl Strategy<Value = Vec<OrderItem>> {
    prop::collection::vec(item_strategy(), 1..=8)
}

// PROPERTY TESTS
proptest! {
    /// Property: the total always equals the rounded sum of price x quantity
    #[test]
    fn prop_total_is_the_rounded_sum(items in items_strategy()) {
        let expected: Decimal = items
            .iter()
            .map(|item| item.price.amount() * Decimal::from(item.quantity))
            .sum();

        prop_assert_eq!(total_of(&items).amount(), expected.round_dp(2));
    }

    /// Property: with two decimal place prices no rounding ever kicks in,
    /// the total is the exact sum
    #[test]
    fn prop_two_dp_prices_sum_exactly(items in items_strategy()) {
        let exact: Decimal = items
            .iter()
            .map(|item| item.price.amount() * Decimal::from(item.quantity))
            .sum();

        prop_assert_eq!(total_of(&items).amount(), exact);
    }

    /// Property: line order does not change the total
    #[test]
    fn prop_total_is_order_independent(mut items in items_strategy()) {
        let total = total_of(&items);
        items.reverse();

        prop_assert_eq!(total_of(&items), total);
    }

    /// Property: a freshly built order is pending and carries the total its
    /// lines dictate, whatever the lines are
    #[test]
    fn prop_new_orders_are_pending_with_line_total(items in items_strategy()) {
        let expected = total_of(&items);
        let order = Order::new(
            "order_test".to_string(),
            "user_test",
            items,
            Timestamp::now(),
        );

        prop_assert_eq!(order.status, OrderStatus::Pending);
        prop_assert_eq!(order.total_amount, expected);
    }

    /// Property: order records survive a CBOR roundtrip unchanged, price
    /// snapshots included
    #[test]
    fn prop_order_encoding_roundtrips(items in items_strategy()) {
        let original = Order::new(
            "order_test".to_string(),
            "user_test",
            items,
            Timestamp::now(),
        );

        let encoding = minicbor::to_vec(&original).unwrap();
        let decoded: Order = minicbor::decode(&encoding).unwrap();

        prop_assert_eq!(original, decoded);
    }
}
