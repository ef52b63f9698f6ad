//! Configuration for StableSwap pools (Curve style).

use serde::{Deserialize, Serialize};

use crate::domain::{validate_denom, Dec, RateMultiplier};
use crate::error::AmmError;
use crate::math::FEE_DENOMINATOR;

/// Upper bound on the amplification coefficient.
pub const MAX_A: u64 = 1_000_000;

/// Parameters for a StableSwap pool.
///
/// # Amplification Parameter
///
/// `initial_a` / `future_a` control the curve shape; the engine
/// interpolates linearly between them up to `future_a_time`.  Passing the
/// same value for both with `future_a_time = 0` fixes `A`.
///
/// # Rate Multipliers
///
/// Exactly two: the engine's base denom first, the pair denom second.
/// Each rate is a fixed-point integer with base `10^18`.
///
/// # Validation
///
/// - `protocol_fee_percentage <= 100`.
/// - `rewards_fee < FEE_DENOMINATOR`.
/// - `max_fee >= 0`.
/// - `0 < initial_a, future_a <= MAX_A`.
/// - Two distinct, well-formed denoms with strictly positive rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableswapConfig {
    protocol_fee_percentage: u8,
    rewards_fee: u64,
    max_fee: Dec,
    initial_a: u64,
    future_a: u64,
    future_a_time: i64,
    rate_multipliers: [RateMultiplier; 2],
}

impl StableswapConfig {
    /// Creates a new `StableswapConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`], [`AmmError::InvalidPercentage`]
    /// or [`AmmError::InvalidDenom`] if any parameter is out of range.
    pub fn new(
        protocol_fee_percentage: u8,
        rewards_fee: u64,
        max_fee: Dec,
        initial_a: u64,
        future_a: u64,
        future_a_time: i64,
        rate_multipliers: [RateMultiplier; 2],
    ) -> Result<Self, AmmError> {
        let config = Self {
            protocol_fee_percentage,
            rewards_fee,
            max_fee,
            initial_a,
            future_a,
            future_a_time,
            rate_multipliers,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`StableswapConfig::new`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.protocol_fee_percentage > 100 {
            return Err(AmmError::InvalidPercentage(
                "protocol fee percentage must be within [0, 100]",
            ));
        }
        if self.rewards_fee >= FEE_DENOMINATOR {
            return Err(AmmError::InvalidConfiguration(
                "rewards fee must be below the fee denominator",
            ));
        }
        if self.max_fee.is_negative() {
            return Err(AmmError::InvalidConfiguration("max fee must not be negative"));
        }
        validate_amplification(self.initial_a)?;
        validate_amplification(self.future_a)?;
        validate_rate_multipliers(&self.rate_multipliers)
    }

    /// Returns the protocol fee percentage.
    #[must_use]
    pub const fn protocol_fee_percentage(&self) -> u8 {
        self.protocol_fee_percentage
    }

    /// Returns the rewards fee rate (over `FEE_DENOMINATOR`).
    #[must_use]
    pub const fn rewards_fee(&self) -> u64 {
        self.rewards_fee
    }

    /// Returns the per-swap fee cap.
    pub const fn max_fee(&self) -> Dec {
        self.max_fee
    }

    /// Returns the initial amplification.
    #[must_use]
    pub const fn initial_a(&self) -> u64 {
        self.initial_a
    }

    /// Returns the target amplification.
    #[must_use]
    pub const fn future_a(&self) -> u64 {
        self.future_a
    }

    /// Returns the ramp end time.
    #[must_use]
    pub const fn future_a_time(&self) -> i64 {
        self.future_a_time
    }

    /// Returns the rate multipliers (base first).
    #[must_use]
    pub const fn rate_multipliers(&self) -> &[RateMultiplier; 2] {
        &self.rate_multipliers
    }

    /// Returns the pair denom (second multiplier).
    #[must_use]
    pub fn pair_denom(&self) -> &str {
        &self.rate_multipliers[1].denom
    }
}

/// Checks `0 < a <= MAX_A`.
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] when out of range.
pub fn validate_amplification(a: u64) -> Result<(), AmmError> {
    if a == 0 || a > MAX_A {
        return Err(AmmError::InvalidConfiguration(
            "amplification must be within [1, 1_000_000]",
        ));
    }
    Ok(())
}

/// Checks two distinct, well-formed denoms with strictly positive rates.
///
/// # Errors
///
/// Returns [`AmmError::InvalidDenom`] or [`AmmError::InvalidConfiguration`].
pub fn validate_rate_multipliers(multipliers: &[RateMultiplier; 2]) -> Result<(), AmmError> {
    for m in multipliers {
        validate_denom(&m.denom)?;
        if m.rate == 0 {
            return Err(AmmError::InvalidConfiguration(
                "rate multipliers must be strictly positive",
            ));
        }
        if m.rate > i128::MAX as u128 {
            return Err(AmmError::InvalidConfiguration("rate multiplier out of range"));
        }
    }
    if multipliers[0].denom == multipliers[1].denom {
        return Err(AmmError::InvalidDenom("pool denoms must be distinct"));
    }
    Ok(())
}
