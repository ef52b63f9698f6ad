//! Outcome of a swap hop.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Coin;
use crate::error::AmmError;

/// The committed outcome of one swap hop, consumed by the token-transfer
/// collaborator.
///
/// # Invariants
///
/// - `input` and `output` are strictly positive.
/// - `input.denom != output.denom`.
/// - Both fees are denominated in the input denom.
///
/// # Examples
///
/// ```
/// use stableswap_engine::domain::{Coin, SwapCommitment};
///
/// let c = SwapCommitment::new(
///     0,
///     Coin::new("uusdn", 1_000),
///     Coin::new("uusdc", 998),
///     Coin::new("uusdn", 1),
///     Coin::new("uusdn", 1),
/// );
/// assert!(c.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapCommitment {
    pool_id: u64,
    input: Coin,
    output: Coin,
    protocol_fee: Coin,
    rewards_fee: Coin,
}

impl SwapCommitment {
    /// Creates a commitment with validated invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if input or output is zero,
    /// or [`AmmError::InvalidDenom`] if the two sides share a denom or a
    /// fee is not in the input denom.
    pub fn new(
        pool_id: u64,
        input: Coin,
        output: Coin,
        protocol_fee: Coin,
        rewards_fee: Coin,
    ) -> crate::error::Result<Self> {
        if input.is_zero() {
            return Err(AmmError::InvalidQuantity("swap input must be positive"));
        }
        if output.is_zero() {
            return Err(AmmError::InvalidQuantity("swap output is zero"));
        }
        if input.denom() == output.denom() {
            return Err(AmmError::InvalidDenom("cannot swap a denom for itself"));
        }
        if protocol_fee.denom() != input.denom() || rewards_fee.denom() != input.denom() {
            return Err(AmmError::InvalidDenom("swap fees must be in the input denom"));
        }
        Ok(Self {
            pool_id,
            input,
            output,
            protocol_fee,
            rewards_fee,
        })
    }

    /// Pool the hop executed against.
    #[must_use]
    pub const fn pool_id(&self) -> u64 {
        self.pool_id
    }

    /// Coin paid into the pool.
    #[must_use]
    pub const fn input(&self) -> &Coin {
        &self.input
    }

    /// Coin paid out to the trader.
    #[must_use]
    pub const fn output(&self) -> &Coin {
        &self.output
    }

    /// Fee routed to the protocol collector.
    #[must_use]
    pub const fn protocol_fee(&self) -> &Coin {
        &self.protocol_fee
    }

    /// Fee routed to the pool's rewards account.
    #[must_use]
    pub const fn rewards_fee(&self) -> &Coin {
        &self.rewards_fee
    }

    /// Sum of both fees in raw input units.
    #[must_use]
    pub const fn total_fee(&self) -> u128 {
        self.protocol_fee.amount().saturating_add(self.rewards_fee.amount())
    }
}

impl fmt::Display for SwapCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapCommitment(pool={}, in={}, out={}, protocol_fee={}, rewards_fee={})",
            self.pool_id, self.input, self.output, self.protocol_fee, self.rewards_fee
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(d: &str, a: u128) -> Coin {
        Coin::new(d, a)
    }

    #[test]
    fn rejects_zero_output() {
        let r = SwapCommitment::new(
            1,
            coin("uusdn", 10),
            coin("uusdc", 0),
            coin("uusdc", 0),
            coin("uusdc", 0),
        );
        assert_eq!(r, Err(AmmError::InvalidQuantity("swap output is zero")));
    }

    #[test]
    fn rejects_self_swap() {
        let r = SwapCommitment::new(
            1,
            coin("uusdn", 10),
            coin("uusdn", 9),
            coin("uusdn", 0),
            coin("uusdn", 0),
        );
        assert!(matches!(r, Err(AmmError::InvalidDenom(_))));
    }

    #[test]
    fn total_fee_sums_parts() {
        let Ok(c) = SwapCommitment::new(
            1,
            coin("uusdn", 100),
            coin("uusdc", 95),
            coin("uusdn", 2),
            coin("uusdn", 3),
        ) else {
            panic!("valid commitment");
        };
        assert_eq!(c.total_fee(), 5);
        assert!(c.to_string().contains("out=95uusdc"));
    }

    #[test]
    fn rejects_fees_outside_input_denom() {
        let r = SwapCommitment::new(
            1,
            coin("uusdn", 100),
            coin("uusdc", 95),
            coin("uusdc", 2),
            coin("uusdn", 3),
        );
        assert!(matches!(r, Err(AmmError::InvalidDenom(_))));
    }
}
