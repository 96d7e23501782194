//! Fixed-point price and balance utilities.
//!
//! ## Overview
//!
//! Prices and balances are stored as integers scaled by 10^8. Prices are
//! `u64` (never negative); balances are `i64` because buyers may end a round
//! below zero. Quantities are whole units and are never scaled.
//!
//! ## Examples
//!
//! ```
//! use double_auction::types::price::{to_fixed, from_fixed, midpoint, from_units};
//!
//! let ask = from_units(10);
//! let bid = to_fixed("20").unwrap();
//! assert_eq!(from_fixed(midpoint(ask, bid)), "15.00000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Signed scaling factor, for balances
pub const SCALE_I64: i64 = SCALE as i64;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert whole units to fixed-point
///
/// Saturates at `u64::MAX` for absurdly large inputs.
///
/// ```
/// use double_auction::types::price::{from_units, SCALE};
///
/// assert_eq!(from_units(3), 3 * SCALE);
/// ```
pub fn from_units(units: u64) -> u64 {
    units.saturating_mul(SCALE)
}

/// Convert whole units to a fixed-point balance
pub fn balance_from_units(units: i64) -> i64 {
    units.saturating_mul(SCALE_I64)
}

/// Convert a decimal string to a fixed-point price
///
/// Returns `None` for negative, unparsable or out-of-range input.
///
/// ```
/// use double_auction::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("22.5"), Some(2_250_000_000));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    if decimal.is_sign_negative() {
        return None;
    }
    scale(decimal)?.to_u64()
}

/// Convert a decimal string to a signed fixed-point balance
pub fn to_fixed_balance(s: &str) -> Option<i64> {
    let decimal = Decimal::from_str(s).ok()?;
    scale(decimal)?.to_i64()
}

fn scale(d: Decimal) -> Option<Decimal> {
    Some(d.checked_mul(Decimal::from(SCALE))?.round_dp(0))
}

/// Convert a fixed-point price to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert a fixed-point balance to a Decimal
pub fn balance_to_decimal(value: i64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render a fixed-point price with 8 decimal places
///
/// ```
/// use double_auction::types::price::from_fixed;
///
/// assert_eq!(from_fixed(2_250_000_000), "22.50000000");
/// ```
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Render a fixed-point balance, trimmed of trailing zeros
///
/// ```
/// use double_auction::types::price::balance_to_string;
///
/// assert_eq!(balance_to_string(-7_500_000_000), "-75");
/// assert_eq!(balance_to_string(1_125_000_000), "11.25");
/// ```
pub fn balance_to_string(value: i64) -> String {
    format!("{}", balance_to_decimal(value).normalize())
}

// ============================================================================
// Auction Arithmetic
// ============================================================================

/// Midpoint of two fixed-point prices, rounded down
///
/// Never overflows, unlike `(a + b) / 2`.
///
/// ```
/// use double_auction::types::price::midpoint;
///
/// assert_eq!(midpoint(10, 20), 15);
/// assert_eq!(midpoint(10, 13), 11);
/// assert_eq!(midpoint(u64::MAX, u64::MAX), u64::MAX);
/// ```
pub fn midpoint(a: u64, b: u64) -> u64 {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}

/// Value of `quantity` whole units at a fixed-point `price`, as a balance delta
///
/// Returns `None` if the result does not fit a balance.
///
/// ```
/// use double_auction::types::price::{notional, from_units, balance_from_units};
///
/// assert_eq!(notional(5, from_units(15)), Some(balance_from_units(75)));
/// assert_eq!(notional(u64::MAX, u64::MAX), None);
/// ```
pub fn notional(quantity: u64, price: u64) -> Option<i64> {
    let raw = (quantity as u128).checked_mul(price as u128)?;
    i64::try_from(raw).ok()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_constant() {
        assert_eq!(SCALE, 100_000_000);
        assert_eq!(SCALE_I64, 100_000_000);
    }

    #[test]
    fn test_to_fixed_edge_cases() {
        assert_eq!(to_fixed("0"), Some(0));
        assert_eq!(to_fixed("0.00000001"), Some(1));
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_to_fixed_balance() {
        assert_eq!(to_fixed_balance("-75"), Some(-7_500_000_000));
        assert_eq!(to_fixed_balance("10000"), Some(balance_from_units(10_000)));
        assert_eq!(to_fixed_balance("x"), None);
    }

    #[test]
    fn test_midpoint_rounds_down() {
        assert_eq!(midpoint(from_units(30), from_units(15)), to_fixed("22.5").unwrap());
        assert_eq!(midpoint(1, 2), 1);
        assert_eq!(midpoint(3, 3), 3);
        assert_eq!(midpoint(0, 0), 0);
    }

    #[test]
    fn test_notional() {
        assert_eq!(notional(0, from_units(100)), Some(0));
        assert_eq!(notional(3, to_fixed("22.5").unwrap()), to_fixed_balance("67.5"));
        // Fits u128 but not i64
        assert_eq!(notional(u64::MAX, 2), None);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(from_fixed(0), "0.00000000");
        assert_eq!(from_fixed(1), "0.00000001");
        assert_eq!(balance_to_string(0), "0");
        assert_eq!(balance_to_string(balance_from_units(10_000)), "10000");
    }
}
