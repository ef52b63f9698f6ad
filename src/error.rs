//! Unified error types for the StableSwap engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type, ensuring a consistent error handling experience for hosts.
//!
//! # Taxonomy
//!
//! | Class | Variants | Host reaction |
//! |-------|----------|---------------|
//! | Validation | `InvalidQuantity`, `InvalidPercentage`, `InvalidRoute`, … | reject the call, state unchanged |
//! | Numerical | `NonConvergence`, `Overflow`, `EmptyPool`, … | fail the single operation |
//! | Invariant violation | `InvariantNotIncreasing`, `UnderflowMismatch`, `BookkeepingMismatch` | fail loudly, indicates a logic defect |
//!
//! Duplicate-key errors are validation-level: they are expected when a
//! provider issues two conflicting calls within the same block.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every error the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    // -- validation ---------------------------------------------------------
    /// An amount is zero, negative, or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A percentage lies outside `[0, 100]`.
    #[error("invalid percentage: {0}")]
    InvalidPercentage(&'static str),

    /// A denomination is not part of the pool or is malformed.
    #[error("invalid denom: {0}")]
    InvalidDenom(&'static str),

    /// A swap route is empty, loops on itself, or references an unknown denom.
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),

    /// Pool or engine configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The requested unbonding resolves to zero shares.
    #[error("invalid unbond amount: {0}")]
    InvalidUnbondAmount(&'static str),

    /// The weighted unbonding period was asked for a non-positive input.
    #[error("shares must be strictly positive")]
    InvalidZeroShares,

    /// No pool is registered under the given id.
    #[error("pool {0} not found")]
    PoolNotFound(u64),

    /// The pool is paused for swaps and deposits.
    #[error("pool {0} is paused")]
    PoolPaused(u64),

    /// A routed swap produced less than the caller's minimum.
    #[error("slippage exceeded: {0}")]
    SlippageExceeded(&'static str),

    /// The provider already owns a bonded position at this timestamp.
    #[error("bonded position already exists for this provider at the current time")]
    DuplicateBondedPosition,

    /// An unbonding position already exists at this `(end_time, provider, pool)` key.
    #[error("unbonding position already exists for this provider at the maturity time")]
    DuplicateUnbondingKey,

    /// A reward window has zero length.
    #[error("reward period too short: {0}")]
    PeriodTooShort(&'static str),

    /// A bank transfer could not be covered by the sender's balance.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(&'static str),

    /// There is nothing to claim.
    #[error("no rewards to claim")]
    NoRewards,

    // -- numerical ----------------------------------------------------------
    /// Newton-Raphson exhausted its iteration budget.
    #[error("newton-raphson did not converge: {0}")]
    NonConvergence(&'static str),

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// One of the pool assets has no liquidity.
    #[error("pool liquidity is empty")]
    EmptyPool,

    // -- invariant violations -----------------------------------------------
    /// A deposit did not strictly grow the invariant `D`.
    #[error("invariant did not increase after deposit")]
    InvariantNotIncreasing,

    /// Bonded balances cannot cover the shares being settled.
    #[error("bonded balance underflow while settling unbonding: {0}")]
    UnderflowMismatch(&'static str),

    /// A running aggregate disagrees with the position records.
    #[error("bookkeeping mismatch: {0}")]
    BookkeepingMismatch(&'static str),
}

impl AmmError {
    /// Returns `true` for errors that signal a bookkeeping defect rather
    /// than bad input.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::InvariantNotIncreasing | Self::UnderflowMismatch(_) | Self::BookkeepingMismatch(_)
        )
    }

    /// Returns `true` for caller-recoverable validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_)
                | Self::InvalidPercentage(_)
                | Self::InvalidDenom(_)
                | Self::InvalidRoute(_)
                | Self::InvalidConfiguration(_)
                | Self::InvalidUnbondAmount(_)
                | Self::InvalidZeroShares
                | Self::PoolNotFound(_)
                | Self::PoolPaused(_)
                | Self::SlippageExceeded(_)
                | Self::DuplicateBondedPosition
                | Self::DuplicateUnbondingKey
                | Self::PeriodTooShort(_)
                | Self::InsufficientFunds(_)
                | Self::NoRewards
        )
    }
}
