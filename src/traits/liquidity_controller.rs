//! Liquidity lifecycle trait extending [`SwapController`].
//!
//! [`LiquidityController`] adds bonding, time-locked unbonding and reward
//! distribution on top of pricing.
//!
//! # Share Accounting Invariant
//!
//! A pool's `total_shares` only changes through
//! [`LiquidityController::add_liquidity`] (mint) and
//! [`LiquidityController::settle_unbonding`] (burn).  Removing liquidity
//! only *queues* shares; they stay bonded until settlement:
//!
//! ```text
//! total_shares = Σ bonded.balance                 over the pool
//! available    = user_bonded − user_unbonding     per provider
//! ```
//!
//! # Reward Isolation
//!
//! Claiming rewards moves coins out of the pool's rewards account only;
//! pool liquidity and share balances are never touched.

use super::SwapController;
use crate::context::Context;
use crate::domain::{Address, BondedPosition, Coin, Dec, UnbondingPosition};
use crate::error::AmmError;
use crate::state::{Bank, UnbondingKey};

/// Trait for controllers that manage liquidity positions and rewards.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common variants:
///
/// - [`AmmError::InvariantNotIncreasing`] if a deposit does not grow `D`.
/// - [`AmmError::InvalidUnbondAmount`] if nothing is available to unbond.
/// - [`AmmError::UnderflowMismatch`] if bonded balances cannot cover a settlement.
/// - [`AmmError::PeriodTooShort`] if a reward window has zero length.
pub trait LiquidityController: SwapController {
    /// Deposits `coins` from `provider` and opens a bonded position.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolPaused`] if the pool is paused.
    /// - [`AmmError::InvalidQuantity`] / [`AmmError::InvalidDenom`] for bad coins.
    /// - [`AmmError::DuplicateBondedPosition`] if `provider` already deposited
    ///   in this pool at the current time.
    /// - [`AmmError::InvariantNotIncreasing`] if `D` does not strictly grow.
    fn add_liquidity<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        coins: &[Coin],
    ) -> Result<BondedPosition, AmmError>;

    /// Queues `percentage` of `provider`'s available shares for unbonding.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidPercentage`] if `percentage` is outside `[0, 100]`.
    /// - [`AmmError::InvalidUnbondAmount`] if the resulting shares are not positive.
    /// - [`AmmError::DuplicateUnbondingKey`] on a same-maturity collision.
    fn remove_liquidity<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
        percentage: Dec,
    ) -> Result<UnbondingPosition, AmmError>;

    /// Settles one matured unbonding: pays out, flushes rewards, burns shares.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnderflowMismatch`] if bonded balances cannot cover the shares.
    /// - Bank and arithmetic errors.
    fn settle_unbonding<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        key: &UnbondingKey,
        position: &UnbondingPosition,
    ) -> Result<(), AmmError>;

    /// Pays `provider` the rewards accrued by their bonded positions.
    ///
    /// Returns the coins transferred; empty if nothing has accrued.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PeriodTooShort`] if a reward window has zero length.
    fn claim_rewards<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        provider: &Address,
    ) -> Result<Vec<Coin>, AmmError>;

    /// Outstanding LP shares.
    #[must_use]
    fn total_shares(&self) -> Dec;
}
