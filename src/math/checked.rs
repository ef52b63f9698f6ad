//! Checked arithmetic trait for [`Dec`].
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of `Option`, so they compose with `?` inside engine operations.
//!
//! # Examples
//!
//! ```
//! use stableswap_engine::domain::Dec;
//! use stableswap_engine::math::CheckedArithmetic;
//!
//! let a = Dec::from_integer(100);
//! let b = Dec::from_integer(200);
//! assert_eq!(a.safe_add(&b), Ok(Dec::from_integer(300)));
//! ```

use crate::domain::Dec;
use crate::error::AmmError;

/// Fallible arithmetic for fixed-point values.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: saturation hides bugs; errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result is out of range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result is out of range.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked fixed-point multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result is out of range.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked fixed-point division.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero, or
    /// [`AmmError::Overflow`] if the result is out of range.
    fn safe_quo(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked `self × numerator / denominator` over plain integers.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `denominator` is zero, or
    /// [`AmmError::Overflow`] if the result is out of range.
    fn safe_mul_ratio(&self, numerator: i128, denominator: i128) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Dec {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("decimal addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("decimal subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(other)
            .ok_or(AmmError::Overflow("decimal multiplication overflow"))
    }

    #[inline]
    fn safe_quo(&self, other: &Self) -> Result<Self, AmmError> {
        if other.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        self.checked_quo(other)
            .ok_or(AmmError::Overflow("decimal division overflow"))
    }

    #[inline]
    fn safe_mul_ratio(&self, numerator: i128, denominator: i128) -> Result<Self, AmmError> {
        if denominator == 0 {
            return Err(AmmError::DivisionByZero);
        }
        self.checked_mul_ratio(numerator, denominator)
            .ok_or(AmmError::Overflow("decimal ratio overflow"))
    }
}
