//! Weighted unbonding period.
//!
//! Exits are delayed in proportion to the fraction of the pool they
//! remove:
//!
//! | Share of pool | Delay |
//! |---------------|-------|
//! | > 10 % | 24 h |
//! | > 1 % | 12 h |
//! | > 0.1 % | 30 min |
//! | otherwise | 1 min |

use super::CheckedArithmetic;
use crate::domain::Dec;
use crate::error::AmmError;

/// One minute, in seconds.
pub const ONE_MINUTE: i64 = 60;
/// Thirty minutes, in seconds.
pub const THIRTY_MINUTES: i64 = 30 * ONE_MINUTE;
/// Twelve hours, in seconds.
pub const TWELVE_HOURS: i64 = 12 * 60 * ONE_MINUTE;
/// Twenty-four hours, in seconds.
pub const TWENTY_FOUR_HOURS: i64 = 24 * 60 * ONE_MINUTE;

/// Returns the unbonding delay in seconds for removing `shares_to_unbond`
/// out of `total_shares`.
///
/// # Errors
///
/// - [`AmmError::InvalidZeroShares`] if either input is not strictly positive.
/// - [`AmmError::Overflow`] if the percentage cannot be represented.
///
/// # Examples
///
/// ```
/// use stableswap_engine::domain::Dec;
/// use stableswap_engine::math::{compute_unbonding_period, THIRTY_MINUTES};
///
/// let p = compute_unbonding_period(Dec::from_integer(10_000), Dec::from_integer(15));
/// assert_eq!(p, Ok(THIRTY_MINUTES));
/// ```
pub fn compute_unbonding_period(total_shares: Dec, shares_to_unbond: Dec) -> Result<i64, AmmError> {
    if !total_shares.is_positive() || !shares_to_unbond.is_positive() {
        return Err(AmmError::InvalidZeroShares);
    }

    let percentage = shares_to_unbond
        .safe_quo(&total_shares)?
        .safe_mul(&Dec::HUNDRED)?;

    let period = if percentage > Dec::from_integer(10) {
        TWENTY_FOUR_HOURS
    } else if percentage > Dec::ONE {
        TWELVE_HOURS
    } else if percentage > Dec::from_raw(Dec::SCALE / 10) {
        THIRTY_MINUTES
    } else {
        ONE_MINUTE
    };
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(total: i64, unbond: i64) -> Result<i64, AmmError> {
        compute_unbonding_period(Dec::from_integer(total), Dec::from_integer(unbond))
    }

    #[test]
    fn thresholds() {
        assert_eq!(period(10_000, 5), Ok(ONE_MINUTE));
        assert_eq!(period(10_000, 15), Ok(THIRTY_MINUTES));
        assert_eq!(period(10_000, 150), Ok(TWELVE_HOURS));
        assert_eq!(period(10_000, 1_200), Ok(TWENTY_FOUR_HOURS));
    }

    #[test]
    fn boundaries_are_exclusive() {
        // exactly 0.1 %, 1 %, 10 %
        assert_eq!(period(10_000, 10), Ok(ONE_MINUTE));
        assert_eq!(period(10_000, 100), Ok(THIRTY_MINUTES));
        assert_eq!(period(10_000, 1_000), Ok(TWELVE_HOURS));
    }

    #[test]
    fn full_exit_is_longest() {
        assert_eq!(period(10_000, 10_000), Ok(TWENTY_FOUR_HOURS));
    }

    #[test]
    fn non_positive_inputs_rejected() {
        assert_eq!(period(0, 5), Err(AmmError::InvalidZeroShares));
        assert_eq!(period(10, 0), Err(AmmError::InvalidZeroShares));
        assert_eq!(period(-10, 5), Err(AmmError::InvalidZeroShares));
    }
}
