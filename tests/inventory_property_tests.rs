//! Property-based tests for the stock ledger
//!
//! The reservation rules are small but load-bearing: stock never goes
//! negative, a failed reservation changes nothing, and restore undoes
//! reserve exactly. proptest drives them across the input space.

use mini_commerce::product::{Product, ProductDraft};
use mini_commerce::types::Timestamp;
use proptest::prelude::*;
use rust_decimal::Decimal;

// PROPERTY TEST STRATEGIES

fn product_strategy() -> impl Strategy<Value = Product> {
    (0u32..=1_000, 1i64..=100_000).prop_map(|(stock, cents)| {
        ProductDraft::new()
            .name("widget")
            .price(Decimal::new(cents, 2))
            .stock(stock)
            .build("prod_test".to_string(), Timestamp::now())
            .unwrap()
    })
}

// PROPERTY TESTS
proptest! {
    /// Property: a reservation succeeds exactly when the stock covers it,
    /// and either way the stock never dips below zero
    #[test]
    fn prop_reserve_succeeds_iff_stock_covers(
        mut product in product_strategy(),
        quantity in 0u32..=2_000,
    ) {
        let before = product.stock;
        let result = product.reserve(quantity);

        if quantity <= before {
            prop_assert!(result.is_ok());
            prop_assert_eq!(product.stock, before - quantity);
        } else {
            let err = result.unwrap_err();
            prop_assert_eq!(err.requested, quantity);
            prop_assert_eq!(err.available, before);
            // a failed reservation is a no-op
            prop_assert_eq!(product.stock, before);
        }
    }

    /// Property: check_available agrees with what reserve would do
    #[test]
    fn prop_check_agrees_with_reserve(
        product in product_strategy(),
        quantity in 0u32..=2_000,
    ) {
        let mut applied = product.clone();

        prop_assert_eq!(
            product.check_available(quantity).is_ok(),
            applied.reserve(quantity).is_ok()
        );
    }

    /// Property: restore after reserve puts the count back exactly
    #[test]
    fn prop_restore_undoes_reserve(mut product in product_strategy()) {
        let before = product.stock;
        let quantity = before / 2;

        product.reserve(quantity).unwrap();
        product.restore(quantity);

        prop_assert_eq!(product.stock, before);
    }

    /// Property: restore is unconditional and additive
    #[test]
    fn prop_restore_always_adds(
        mut product in product_strategy(),
        quantity in 0u32..=2_000,
    ) {
        let before = product.stock;
        product.restore(quantity);

        prop_assert_eq!(product.stock, before + quantity);
    }
}
