//! Denominated token amount.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// A raw token amount tagged with its denomination (e.g. `uusdc`).
///
/// The amount is in the smallest unit of the denom and is never
/// interpreted as a decimal.
///
/// # Examples
///
/// ```
/// use stableswap_engine::domain::Coin;
///
/// let c = Coin::new("uusdn", 1_000_000);
/// assert_eq!(c.denom(), "uusdn");
/// assert_eq!(c.amount(), 1_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    denom: String,
    amount: u128,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Returns the denomination.
    #[must_use]
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// Returns the raw amount.
    #[must_use]
    pub const fn amount(&self) -> u128 {
        self.amount
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Checks the denom is well formed and the amount strictly positive.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidDenom`] if the denom is malformed.
    /// - [`AmmError::InvalidQuantity`] if the amount is zero.
    pub fn validate_positive(&self) -> Result<(), AmmError> {
        validate_denom(&self.denom)?;
        if self.amount == 0 {
            return Err(AmmError::InvalidQuantity("coin amount must be positive"));
        }
        Ok(())
    }
}

/// Checks a denom is 2–128 characters of `[a-zA-Z0-9/:._-]`, starting with a letter.
///
/// # Errors
///
/// Returns [`AmmError::InvalidDenom`] when the denom is malformed.
pub fn validate_denom(denom: &str) -> Result<(), AmmError> {
    let len = denom.len();
    if !(2..=128).contains(&len) {
        return Err(AmmError::InvalidDenom("denom length must be 2-128"));
    }
    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(AmmError::InvalidDenom("denom must start with a letter"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        return Err(AmmError::InvalidDenom("denom contains invalid characters"));
    }
    Ok(())
}

/// Returns the amount of `denom` in `coins`, or zero.
#[must_use]
pub fn amount_of(coins: &[Coin], denom: &str) -> u128 {
    coins
        .iter()
        .filter(|c| c.denom == denom)
        .map(|c| c.amount)
        .fold(0u128, u128::saturating_add)
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
