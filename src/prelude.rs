//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use stableswap_engine::prelude::*;
//! ```
//!
//! This re-exports the most frequently used domain types, core traits,
//! configuration types, error types, and the engine itself so that
//! consumers don't need to import from individual submodules.

pub use crate::domain::{
    Address, BlockInfo, BondedPosition, Coin, Dec, Pool, Rate, RateMultiplier, Route,
    SwapCommitment, UnbondingPosition,
};

pub use crate::traits::{FromConfig, LiquidityController, SwapController};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{EngineConfig, PoolConfig, StableswapConfig};

pub use crate::error::{AmmError, Result};

pub use crate::context::Context;
pub use crate::engine::Engine;
pub use crate::factory::DefaultPoolFactory;
pub use crate::pools::Controller;
pub use crate::state::{Bank, MemoryBank, State};
