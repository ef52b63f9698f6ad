//! Pool records: the generic pool header and StableSwap parameters.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Address, Dec};

/// Pricing algorithm backing a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Algorithm {
    /// Curve-style StableSwap invariant.
    Stableswap = 1,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stableswap => write!(f, "STABLESWAP"),
        }
    }
}

/// Algorithm-independent pool header.
///
/// Every pool pairs the engine's base denom with exactly one `pair` denom.
/// The pair is immutable; liquidity lives in [`Pool::address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Sequential pool id.
    pub id: u64,
    /// Account holding the pool's liquidity.
    pub address: Address,
    /// Pricing algorithm.
    pub algorithm: Algorithm,
    /// Denom paired against the base denom.
    pub pair: String,
    /// Paused pools reject swaps and deposits.
    pub paused: bool,
}

impl Pool {
    /// Account accumulating rewards fees for this pool.
    #[must_use]
    pub const fn rewards_address(&self) -> Address {
        Address::rewards_account(self.id)
    }
}

/// Scaling factor normalising one asset onto the shared invariant.
///
/// `rate` is a fixed-point integer with base [`PRECISION`](crate::math::PRECISION);
/// `10^18` means "one raw unit counts as one invariant unit".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateMultiplier {
    /// Asset denom.
    pub denom: String,
    /// Scaling factor, strictly positive.
    pub rate: u128,
}

impl RateMultiplier {
    /// Creates a rate multiplier.
    pub fn new(denom: impl Into<String>, rate: u128) -> Self {
        Self {
            denom: denom.into(),
            rate,
        }
    }
}

/// StableSwap-specific configuration and share accumulator for one pool.
///
/// # Invariants
///
/// - `protocol_fee_percentage <= 100`.
/// - Both rate multipliers are strictly positive.
/// - `total_shares >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableswapPool {
    /// Share of the swap fee routed to the protocol, in percent.
    pub protocol_fee_percentage: u8,
    /// Swap fee rate, numerator over [`FEE_DENOMINATOR`](crate::math::FEE_DENOMINATOR).
    pub rewards_fee: u64,
    /// Upper bound on the fee of a single swap, in adjusted output units.
    /// Zero disables the cap.
    pub max_fee: Dec,
    /// Amplification at the start of the current ramp.
    pub initial_a: u64,
    /// Amplification at the end of the current ramp.
    pub future_a: u64,
    /// Ramp start (unix seconds).
    pub initial_a_time: i64,
    /// Ramp end (unix seconds).
    pub future_a_time: i64,
    /// Exactly two multipliers: base denom first, pair denom second.
    pub rate_multipliers: [RateMultiplier; 2],
    /// Outstanding LP shares (bonded and unbonding).
    pub total_shares: Dec,
    /// Start of the current reward clock; reset when liquidity returns from zero.
    pub initial_rewards_time: i64,
}

impl StableswapPool {
    /// Returns the rate multiplier for `denom`, if the denom belongs to the pool.
    #[must_use]
    pub fn rate_of(&self, denom: &str) -> Option<u128> {
        self.rate_multipliers
            .iter()
            .find(|m| m.denom == denom)
            .map(|m| m.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StableswapPool {
        StableswapPool {
            protocol_fee_percentage: 50,
            rewards_fee: 2_500_000,
            max_fee: Dec::ZERO,
            initial_a: 100,
            future_a: 100,
            initial_a_time: 0,
            future_a_time: 0,
            rate_multipliers: [
                RateMultiplier::new("uusdn", 1_000_000_000_000_000_000),
                RateMultiplier::new("uusdc", 2_000_000_000_000_000_000),
            ],
            total_shares: Dec::ZERO,
            initial_rewards_time: 0,
        }
    }

    #[test]
    fn rate_lookup() {
        let p = params();
        assert_eq!(p.rate_of("uusdc"), Some(2_000_000_000_000_000_000));
        assert_eq!(p.rate_of("uatom"), None);
    }

    #[test]
    fn rewards_address_differs_from_pool_address() {
        let pool = Pool {
            id: 4,
            address: Address::pool_account(4),
            algorithm: Algorithm::Stableswap,
            pair: "uusdc".into(),
            paused: false,
        };
        assert_ne!(pool.rewards_address(), pool.address);
    }

    #[test]
    fn algorithm_display() {
        assert_eq!(Algorithm::Stableswap.to_string(), "STABLESWAP");
    }
}
