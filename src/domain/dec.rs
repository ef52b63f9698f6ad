//! Signed fixed-point decimal with 18 fractional digits.

use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A signed fixed-point decimal stored as `value × 10^18` in an `i128`.
///
/// `Dec` is the only numeric type that crosses the engine boundary for
/// shares, adjusted balances and fee accumulators.  It never uses floating
/// point: every multiplication and division truncates toward zero, so two
/// replicas evaluating the same expression always agree bit for bit.
///
/// Arithmetic methods are checked: they return `None` on overflow or
/// division by zero instead of panicking.  Intermediate products are
/// widened to 256 bits, so `a × b / c` only fails when the *result* does
/// not fit.
///
/// # Examples
///
/// ```
/// use stableswap_engine::domain::Dec;
///
/// let a = Dec::from_integer(3);
/// let b = Dec::from_integer(2);
/// assert_eq!(a.checked_quo(&b), Some(Dec::from_raw(1_500_000_000_000_000_000)));
/// assert_eq!(a.checked_mul(&b), Some(Dec::from_integer(6)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[must_use]
pub struct Dec(i128);

impl Dec {
    /// Number of fractional digits.
    pub const DECIMALS: u32 = 18;

    /// `10^18`, the raw representation of one whole unit.
    pub const SCALE: i128 = 1_000_000_000_000_000_000;

    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One whole unit.
    pub const ONE: Self = Self(Self::SCALE);

    /// One hundred whole units, used for percentage math.
    pub const HUNDRED: Self = Self(100 * Self::SCALE);

    /// Largest representable value.
    pub const MAX: Self = Self(i128::MAX);

    /// Wraps a raw scaled value.
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Returns the raw scaled value.
    #[must_use]
    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// Converts a whole number of units.
    ///
    /// Values above `i128::MAX / 10^18` saturate to [`Dec::MAX`]; use
    /// [`Dec::checked_from_integer`] when the input is untrusted.
    pub const fn from_integer(value: i64) -> Self {
        match (value as i128).checked_mul(Self::SCALE) {
            Some(v) => Self(v),
            None => Self::MAX,
        }
    }

    /// Checked conversion from an unsigned whole number of units.
    #[must_use]
    pub const fn checked_from_integer(value: u128) -> Option<Self> {
        if value > i128::MAX as u128 {
            return None;
        }
        match (value as i128).checked_mul(Self::SCALE) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the value is strictly less than zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Absolute value (saturating at [`Dec::MAX`]).
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked fixed-point multiplication: `self × other / 10^18`.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        mul_div(self.0, other.0, Self::SCALE).map(Self)
    }

    /// Checked fixed-point division: `self × 10^18 / other`.
    ///
    /// Returns `None` if `other` is zero.
    #[must_use]
    pub fn checked_quo(&self, other: &Self) -> Option<Self> {
        mul_div(self.0, Self::SCALE, other.0).map(Self)
    }

    /// Checked multiplication by a plain integer.
    #[must_use]
    pub fn checked_mul_int(&self, factor: i128) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Checked division by a plain integer, truncating toward zero.
    #[must_use]
    pub fn checked_quo_int(&self, divisor: i128) -> Option<Self> {
        self.0.checked_div(divisor).map(Self)
    }

    /// Computes `self × numerator / denominator` with a 256-bit
    /// intermediate, where both factors are plain integers.
    ///
    /// Used for rate multipliers (`numerator = rate`, `denominator = 10^18`)
    /// and fee rates.
    #[must_use]
    pub fn checked_mul_ratio(&self, numerator: i128, denominator: i128) -> Option<Self> {
        mul_div(self.0, numerator, denominator).map(Self)
    }

    /// Whole units, truncated toward zero.
    #[must_use]
    pub const fn truncate_int(&self) -> i128 {
        self.0 / Self::SCALE
    }

    /// Whole units as `u128`, or `None` when negative.
    #[must_use]
    pub const fn to_u128_truncated(&self) -> Option<u128> {
        if self.0 < 0 {
            return None;
        }
        Some((self.0 / Self::SCALE) as u128)
    }

    /// Returns the smaller of two values.
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }
}

/// `a × b / c` over 256-bit magnitudes, truncated toward zero.
fn mul_div(a: i128, b: i128, c: i128) -> Option<i128> {
    if c == 0 {
        return None;
    }
    let negative = (a < 0) ^ (b < 0) ^ (c < 0);
    let product = U256::from(a.unsigned_abs()).checked_mul(U256::from(b.unsigned_abs()))?;
    let quotient = product / U256::from(c.unsigned_abs());
    if quotient.bits() > 127 {
        return None;
    }
    let magnitude = i128::try_from(quotient.low_u128()).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE.unsigned_abs();
        write!(f, "{sign}{}.{:018}", abs / scale, abs % scale)
    }
}
