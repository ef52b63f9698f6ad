//! Pricing and swap capability shared by every pool algorithm.
//!
//! [`SwapController`] is the pricing half of a pool controller:
//!
//! 1. **Quote**: [`SwapController::simulate_swap`] prices a trade against
//!    the pool's current liquidity without moving any funds.
//! 2. **Execute**: [`SwapController::swap`] prices the trade and commits
//!    the transfers it implies.
//! 3. **Inspect**: [`SwapController::rates`] and
//!    [`SwapController::liquidity`] report the pool's current state.
//!
//! # Fee Model
//!
//! Fees are sized on the *output* side and charged in the input denom:
//!
//! ```text
//! fee      = dy × rewards_fee / FEE_DENOMINATOR     (capped at max_fee)
//! protocol = fee × protocol_fee_percentage / 100
//! rewards  = fee − protocol
//! output   = dy − fee
//! ```
//!
//! `protocol` and `rewards` are converted to raw input units with the input
//! rate multiplier and paid out of the trader's input.
//!
//! # Dispatch Model
//!
//! Controllers are dispatched via the [`Controller`](crate::pools::Controller)
//! enum, not `dyn` trait objects, so the trait may carry generic methods.

use crate::context::Context;
use crate::domain::{Address, Coin, Pool, Rate, SwapCommitment};
use crate::error::AmmError;
use crate::state::Bank;

/// Core pricing trait for pool controllers.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common variants:
///
/// - [`AmmError::InvalidDenom`] if a denom is not part of the pool.
/// - [`AmmError::EmptyPool`] if either side of the pool holds no liquidity.
/// - [`AmmError::NonConvergence`] if the invariant solver gives up.
pub trait SwapController {
    /// Returns the pool header.
    #[must_use]
    fn pool(&self) -> &Pool;

    /// Returns the pool's raw liquidity, one coin per pool denom.
    fn liquidity<B: Bank>(&self, bank: &B) -> Vec<Coin>;

    /// Prices `input` for `denom_to` against current liquidity at `now`.
    ///
    /// No state or balance changes.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidDenom`] if either denom is foreign to the pool.
    /// - [`AmmError::InvalidRoute`] if `input` is already in `denom_to`.
    /// - [`AmmError::EmptyPool`] if either liquidity side is non-positive.
    fn simulate_swap<B: Bank>(
        &self,
        bank: &B,
        input: &Coin,
        denom_to: &str,
        now: i64,
    ) -> Result<SwapCommitment, AmmError>;

    /// Executes one swap hop for `signer` and moves the funds.
    ///
    /// # Errors
    ///
    /// Everything [`SwapController::simulate_swap`] returns, plus
    /// [`AmmError::PoolPaused`] and bank errors.
    fn swap<B: Bank + Clone>(
        &mut self,
        ctx: &mut Context<'_, B>,
        signer: &Address,
        input: &Coin,
        denom_to: &str,
    ) -> Result<SwapCommitment, AmmError>;

    /// Returns fee-less prices of each pool denom in terms of the other.
    ///
    /// # Errors
    ///
    /// - [`AmmError::EmptyPool`] if either liquidity side is non-positive.
    fn rates<B: Bank>(&self, bank: &B, now: i64) -> Result<Vec<Rate>, AmmError>;
}
