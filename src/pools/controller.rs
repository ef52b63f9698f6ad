//! Enum dispatch wrapper for all pool controllers.
//!
//! [`Controller`] wraps every concrete controller behind a single enum,
//! so call sites never name an algorithm.  Each variant is feature-gated
//! to match its controller type; a new algorithm is a new variant.

#[cfg(feature = "stableswap")]
use super::stableswap::StableswapController;

use crate::config::PoolConfig;
use crate::context::Context;
use crate::domain::{
    Address, Algorithm, BondedPosition, Coin, Dec, Pool, Rate, SwapCommitment, UnbondingPosition,
};
use crate::error::AmmError;
use crate::state::{Bank, State, UnbondingKey};
use crate::traits::{LiquidityController, SwapController};

/// Zero-cost dispatch enum over pool controllers.
///
/// Implements [`SwapController`] and [`LiquidityController`] by delegating
/// every call to the inner controller via `match`.
///
/// # Example
///
/// ```text
/// let controller = Controller::load(&state, pool_id)?;
/// let quote = controller.simulate_swap(&bank, &coin, "uusdc", now)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Controller {
    /// StableSwap (Curve style).
    #[cfg(feature = "stableswap")]
    Stableswap(Box<StableswapController>),
}

/// Delegates a method call to every `Controller` variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            #[cfg(feature = "stableswap")]
            Controller::Stableswap(c) => c.$method($($arg),*),
        }
    };
}

impl Controller {
    /// Loads the controller for `pool_id` from stored records.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if the pool or its parameters are missing.
    /// - [`AmmError::InvalidConfiguration`] if the pool's algorithm is not
    ///   compiled in.
    pub fn load(state: &State, pool_id: u64) -> Result<Self, AmmError> {
        let pool = state.pool(pool_id)?;
        match pool.algorithm {
            #[cfg(feature = "stableswap")]
            Algorithm::Stableswap => {
                let params = state.stableswap_pool(pool_id)?;
                Ok(Self::Stableswap(Box::new(StableswapController::new(
                    pool.clone(),
                    params.clone(),
                ))))
            }
            #[allow(unreachable_patterns)]
            _ => Err(AmmError::InvalidConfiguration(
                "pool algorithm is not enabled in this build",
            )),
        }
    }

    /// Pricing algorithm of the wrapped controller.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            #[cfg(feature = "stableswap")]
            Self::Stableswap(_) => Algorithm::Stableswap,
        }
    }

    /// Current amplification, scaled by [`A_PRECISION`](crate::math::A_PRECISION).
    #[must_use]
    pub fn current_a(&self, now: i64) -> u128 {
        delegate!(self, current_a(now))
    }

    /// Applies updated parameters for the matching algorithm.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `config` targets another algorithm.
    /// - Any validation error of the inner update.
    pub fn update<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        config: &PoolConfig,
    ) -> Result<(), AmmError> {
        match (self, config) {
            #[cfg(feature = "stableswap")]
            (Self::Stableswap(c), PoolConfig::Stableswap(cfg)) => c.update_params(ctx, cfg),
            #[allow(unreachable_patterns)]
            _ => Err(AmmError::InvalidConfiguration(
                "configuration does not match the pool algorithm",
            )),
        }
    }

    /// Pauses or resumes swaps and deposits.
    pub fn set_paused<B>(&mut self, ctx: &mut Context<'_, B>, paused: bool) {
        delegate!(self, set_paused(ctx, paused));
    }
}

impl SwapController for Controller {
    fn pool(&self) -> &Pool {
        delegate!(self, pool())
    }

    fn liquidity<B: Bank>(&self, bank: &B) -> Vec<Coin> {
        delegate!(self, liquidity(bank))
    }

    fn simulate_swap<B: Bank>(
        &self,
        bank: &B,
        input: &Coin,
        denom_to: &str,
        now: i64,
    ) -> Result<SwapCommitment, AmmError> {
        delegate!(self, simulate_swap(bank, input, denom_to, now))
    }

    fn swap<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        signer: &Address,
        input: &Coin,
        denom_to: &str,
    ) -> Result<SwapCommitment, AmmError> {
        delegate!(self, swap(ctx, signer, input, denom_to))
    }

    fn rates<B: Bank>(&self, bank: &B, now: i64) -> Result<Vec<Rate>, AmmError> {
        delegate!(self, rates(bank, now))
    }
}

impl LiquidityController for Controller {
    fn add_liquidity<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        coins: &[Coin],
    ) -> Result<BondedPosition, AmmError> {
        delegate!(self, add_liquidity(ctx, provider, coins))
    }

    fn remove_liquidity<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        percentage: Dec,
    ) -> Result<UnbondingPosition, AmmError> {
        delegate!(self, remove_liquidity(ctx, provider, percentage))
    }

    fn settle_unbonding<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        key: &UnbondingKey,
        position: &UnbondingPosition,
    ) -> Result<(), AmmError> {
        delegate!(self, settle_unbonding(ctx, key, position))
    }

    fn claim_rewards<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
    ) -> Result<Vec<Coin>, AmmError> {
        delegate!(self, claim_rewards(ctx, provider))
    }

    fn total_shares(&self) -> Dec {
        delegate!(self, total_shares())
    }
}
