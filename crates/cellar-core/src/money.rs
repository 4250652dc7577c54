//! # Money Module
//!
//! Rounding helpers shared by every pricing derivation.
//!
//! ## Why Round at Every Step?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE DRIFT PROBLEM                                                      │
//! │                                                                         │
//! │  Price 19.89, discount 23%:                                             │
//! │    price per bottle = 19.89 × 0.77 = 15.3153 → 15.32                    │
//! │                                                                         │
//! │  Deriving the discount back from the ROUNDED bottle price:             │
//! │    (1 − 15.32 / 19.89) × 100 = 22.976… → 22.98  ❌ drifted              │
//! │                                                                         │
//! │  OUR SOLUTION:                                                          │
//! │    Round each derived value once, where it is derived, and keep the    │
//! │    caller's authoritative input instead of re-deriving it.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cellar_core::money::{round_money, snap_to_step};
//!
//! assert_eq!(round_money(15.3153), 15.32);
//! assert_eq!(snap_to_step(16.39, 0.5).unwrap(), 16.5);
//! ```

use crate::validation::{validate_step, ValidationResult};

/// Number of decimal places kept by [`round_money`].
pub const MONEY_DECIMALS: i32 = 2;

/// Rounds a value to two decimal places.
///
/// Ties round toward positive infinity. `f64::EPSILON` is added before
/// scaling so that values like `1.005`, stored as `1.00499999…`, still round
/// up to `1.01`.
///
/// ## Example
/// ```rust
/// use cellar_core::money::round_money;
///
/// assert_eq!(round_money(146.3666), 146.37);
/// assert_eq!(round_money(1.005), 1.01);
/// assert_eq!(round_money(-2.345), -2.34);
/// ```
pub fn round_money(value: f64) -> f64 {
    let factor = 10f64.powi(MONEY_DECIMALS);
    round_half_up((value + f64::EPSILON) * factor) / factor
}

/// Snaps a value to the nearest multiple of `step`, then rounds to cents.
///
/// ## Example
/// ```rust
/// use cellar_core::money::snap_to_step;
///
/// assert_eq!(snap_to_step(16.39, 1.0).unwrap(), 16.0);
/// assert_eq!(snap_to_step(16.39, 0.1).unwrap(), 16.4);
/// assert!(snap_to_step(16.39, 0.0).is_err());
/// ```
pub fn snap_to_step(value: f64, step: f64) -> ValidationResult<f64> {
    validate_step("step", step)?;
    Ok(round_money(round_half_up(value / step) * step))
}

/// Nearest integer, ties toward positive infinity.
///
/// `f64::round` sends ties away from zero, which would make `-2.5` round to
/// `-3`; pricing expects `-2`.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_basic() {
        assert_eq!(round_money(15.3153), 15.32);
        assert_eq!(round_money(81.6433), 81.64);
        assert_eq!(round_money(100.0), 100.0);
        assert_eq!(round_money(0.0), 0.0);
    }

    #[test]
    fn test_round_money_ties_go_up() {
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(1.005), 1.01);
        assert_eq!(round_money(-0.125), -0.12);
    }

    #[test]
    fn test_round_money_is_idempotent() {
        for value in [19.23, 146.37, 0.01, 177.9, 1234.56] {
            assert_eq!(round_money(round_money(value)), round_money(value));
        }
    }

    #[test]
    fn test_snap_to_step() {
        assert_eq!(snap_to_step(16.39, 1.0).unwrap(), 16.0);
        assert_eq!(snap_to_step(16.67, 1.0).unwrap(), 17.0);
        assert_eq!(snap_to_step(16.39, 0.5).unwrap(), 16.5);
        assert_eq!(snap_to_step(12.34, 0.5).unwrap(), 12.5);
        assert_eq!(snap_to_step(12.67, 0.5).unwrap(), 12.5);
        assert_eq!(snap_to_step(16.39, 0.1).unwrap(), 16.4);
    }

    #[test]
    fn test_snap_to_step_rejects_bad_steps() {
        assert!(snap_to_step(10.0, 0.0).is_err());
        assert!(snap_to_step(10.0, -1.0).is_err());
        assert!(snap_to_step(10.0, f64::INFINITY).is_err());
    }
}
