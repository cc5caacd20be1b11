//! Property-Based Tests: Domain Layer Invariants
//!
//! Uses `proptest` to verify that the capacity math and threshold
//! matching agree with plain machine-integer arithmetic on random
//! inputs.

use num_bigint::BigInt;
use proptest::prelude::*;
use rust_decimal::Decimal;

use paradex_deposit_bot::domain::capacity::{compute_capacity, decode_hex};
use paradex_deposit_bot::domain::subscription::{Subscription, parse_threshold};

// ── Hex Decoding Properties ─────────────────────────────────

proptest! {
    /// Decoding a formatted u128 gives back the same number, with or
    /// without prefix and in either case.
    #[test]
    fn decode_matches_u128(value in any::<u128>(), upper in any::<bool>()) {
        let hex = if upper { format!("{value:X}") } else { format!("{value:x}") };

        prop_assert_eq!(decode_hex(&format!("0x{hex}")).unwrap(), BigInt::from(value));
        prop_assert_eq!(decode_hex(&hex).unwrap(), BigInt::from(value));
    }

    /// Strings with a non-hex character never decode.
    #[test]
    fn decode_rejects_non_hex(prefix in "[0-9a-f]{0,8}", bad in "[g-zG-Z!-/]", suffix in "[0-9a-f]{0,8}") {
        let raw = format!("0x{prefix}{bad}{suffix}");
        prop_assert!(decode_hex(&raw).is_err(), "{raw} must be rejected");
    }
}

// ── Capacity Properties ─────────────────────────────────────

proptest! {
    /// Capacity equals i128 subtraction then division (Rust `/`
    /// truncates toward zero, like the BigInt division).
    #[test]
    fn capacity_matches_i128(limit in any::<u64>(), used in any::<u64>()) {
        let expected = (i128::from(limit) - i128::from(used)) / 1_000_000;
        let capacity = compute_capacity(&BigInt::from(limit), &BigInt::from(used));
        prop_assert_eq!(capacity, BigInt::from(expected));
    }

    /// Capacity is monotonically non-increasing in deposited assets.
    #[test]
    fn capacity_shrinks_as_vault_fills(limit in any::<u64>(), used in any::<u64>(), more in 0u64..10_000_000_000) {
        let limit = BigInt::from(limit);
        let before = compute_capacity(&limit, &BigInt::from(used));
        let after = compute_capacity(&limit, &(BigInt::from(used) + BigInt::from(more)));
        prop_assert!(after <= before);
    }
}

// ── Threshold Properties ────────────────────────────────────

proptest! {
    /// A subscription fires exactly when capacity exceeds the floored
    /// threshold; a zero threshold never fires.
    #[test]
    fn trigger_matches_floored_comparison(
        cents in -10_000_000i64..10_000_000,
        capacity in -200_000i64..200_000,
    ) {
        let threshold = Decimal::new(cents, 2);
        let subscription = Subscription {
            threshold: Some(threshold),
            ..Subscription::default()
        };
        let floored = cents.div_euclid(100);

        prop_assert_eq!(
            subscription.is_triggered_by(&BigInt::from(capacity)),
            cents != 0 && capacity > floored
        );
    }

    /// Any positive integer typed by a user parses to itself.
    #[test]
    fn positive_integers_parse(amount in 1u64..1_000_000_000_000, dollar in any::<bool>()) {
        let text = if dollar { format!("${amount}") } else { format!(" {amount} ") };
        prop_assert_eq!(parse_threshold(&text).unwrap(), Decimal::from(amount));
    }

    /// Zero and negative amounts are always rejected.
    #[test]
    fn non_positive_amounts_rejected(amount in -1_000_000i64..=0) {
        prop_assert!(parse_threshold(&amount.to_string()).is_err());
    }
}
