//! Deposit capacity math.
//!
//! The vault exposes two unsigned on-chain values, the TVL limit and the
//! total assets currently deposited. Both arrive as hex strings of
//! unbounded width (Starknet felts / u256 low words) and are decoded into
//! `BigInt` so no precision is ever lost.
//!
//! Capacity = (limit - used) / 10^6, truncated toward zero. The divisor
//! converts USDC atomic units (6 decimals) to whole dollars. The result is
//! NOT clamped at zero: an over-filled vault yields a negative capacity.

use num_bigint::{BigInt, BigUint};
use thiserror::Error;

/// Scale between on-chain atomic units and whole dollars.
pub const CAPACITY_DIVISOR: u64 = 1_000_000;

/// Error decoding a hexadecimal chain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input was empty (or only a `0x` prefix).
    #[error("empty hex value")]
    Empty,
    /// Input contained a character outside `[0-9a-fA-F]`.
    #[error("invalid hex value {0:?}")]
    InvalidDigit(String),
}

/// Decode a node-returned hex string into an arbitrary-precision integer.
///
/// Accepts an optional `0x`/`0X` prefix. Values wider than 64 (or 128)
/// bits decode exactly.
pub fn decode_hex(raw: &str) -> Result<BigInt, DecodeError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(DecodeError::Empty);
    }

    // parse_bytes tolerates `_` separators; the node never sends them.
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidDigit(raw.to_string()));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16)
        .map(BigInt::from)
        .ok_or_else(|| DecodeError::InvalidDigit(raw.to_string()))
}

/// Compute available deposit capacity in whole dollars.
///
/// `(limit - used) / 1_000_000` with truncation toward zero, so
/// `-1_500_000` becomes `-1`, not `-2`.
pub fn compute_capacity(limit: &BigInt, used: &BigInt) -> BigInt {
    (limit - used) / BigInt::from(CAPACITY_DIVISOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_and_without_prefix() {
        assert_eq!(decode_hex("0x10").unwrap(), BigInt::from(16));
        assert_eq!(decode_hex("ff").unwrap(), BigInt::from(255));
        assert_eq!(decode_hex("0XFF").unwrap(), BigInt::from(255));
        assert_eq!(decode_hex("0x0").unwrap(), BigInt::from(0));
    }

    #[test]
    fn test_decode_beyond_u128() {
        // 2^160
        let value = decode_hex("0x10000000000000000000000000000000000000000").unwrap();
        assert_eq!(
            value.to_string(),
            "1461501637330902918203684832716283019655932542976"
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_hex(""), Err(DecodeError::Empty));
        assert_eq!(decode_hex("0x"), Err(DecodeError::Empty));
        assert!(matches!(decode_hex("0xzz"), Err(DecodeError::InvalidDigit(_))));
        assert!(matches!(decode_hex("0x1_0"), Err(DecodeError::InvalidDigit(_))));
        assert!(matches!(decode_hex("-0x10"), Err(DecodeError::InvalidDigit(_))));
    }

    #[test]
    fn test_capacity_basic() {
        let limit = BigInt::from(5_000_000);
        let used = BigInt::from(1_000_000);
        assert_eq!(compute_capacity(&limit, &used), BigInt::from(4));
    }

    #[test]
    fn test_capacity_truncates() {
        let limit = BigInt::from(3_999_999);
        let used = BigInt::from(0);
        assert_eq!(compute_capacity(&limit, &used), BigInt::from(3));
    }

    #[test]
    fn test_capacity_negative_truncates_toward_zero() {
        let limit = BigInt::from(1_000_000);
        let used = BigInt::from(2_500_000);
        assert_eq!(compute_capacity(&limit, &used), BigInt::from(-1));
    }

    #[test]
    fn test_capacity_realistic_vault_values() {
        // 10M USDC limit, 9_876_543.21 USDC deposited
        let limit = decode_hex("0x9184e72a000").unwrap();
        let used = decode_hex("0x8fb8fd9828a").unwrap();
        assert_eq!(limit, BigInt::from(10_000_000_000_000u64));
        assert_eq!(used, BigInt::from(9_876_543_210_122u64));
        assert_eq!(compute_capacity(&limit, &used), BigInt::from(123_456));
    }
}
