//! Bonded and unbonding liquidity positions.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Coin, Dec};

/// An active liquidity stake earning rewards.
///
/// Keyed by `(pool_id, provider, timestamp)`; see
/// [`BondedKey`](crate::state::BondedKey).  Created by each deposit and
/// only mutated when rewards are claimed (`rewards_period_start`) or when a
/// matured unbonding consumes part of its balance.
///
/// # Invariants
///
/// - `balance` is never persisted negative.
/// - `rewards_period_start >= timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondedPosition {
    /// Shares held by this position.
    pub balance: Dec,
    /// Creation time (unix seconds).
    pub timestamp: i64,
    /// Time of the last reward claim (unix seconds).
    pub rewards_period_start: i64,
}

impl BondedPosition {
    /// Creates a fresh position opened at `now`.
    pub const fn new(balance: Dec, now: i64) -> Self {
        Self {
            balance,
            timestamp: now,
            rewards_period_start: now,
        }
    }
}

impl fmt::Display for BondedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BondedPosition(balance={}, created={}, rewards_since={})",
            self.balance, self.timestamp, self.rewards_period_start
        )
    }
}

/// A liquidity stake in its time-locked exit window.
///
/// Keyed by `(end_time, provider, pool_id)`; see
/// [`UnbondingKey`](crate::state::UnbondingKey).  Settled atomically and
/// removed once `end_time` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingPosition {
    /// Shares being unbonded.
    pub shares: Dec,
    /// Tokens released at maturity, fixed when the unbonding was requested.
    pub amount: Vec<Coin>,
    /// Maturity (unix seconds).
    pub end_time: i64,
}

impl fmt::Display for UnbondingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnbondingPosition(shares={}, amount=[", self.shares)?;
        for (i, coin) in self.amount.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{coin}")?;
        }
        write!(f, "], end_time={})", self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bonded_starts_reward_clock_at_creation() {
        let p = BondedPosition::new(Dec::from_integer(10), 1_700_000_000);
        assert_eq!(p.timestamp, 1_700_000_000);
        assert_eq!(p.rewards_period_start, p.timestamp);
    }

    #[test]
    fn display_unbonding() {
        let u = UnbondingPosition {
            shares: Dec::from_integer(1),
            amount: vec![Coin::new("uusdn", 5), Coin::new("uusdc", 6)],
            end_time: 60,
        };
        let s = u.to_string();
        assert!(s.contains("5uusdn,6uusdc"));
        assert!(s.contains("end_time=60"));
    }
}
