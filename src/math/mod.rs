//! Deterministic arithmetic for the StableSwap engine.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe decimal
//! operations, the amplification ramp ([`get_a`]), the Newton-Raphson
//! invariant solvers ([`calculate_invariant`], [`get_y`]) and the weighted
//! unbonding period ([`compute_unbonding_period`]).
//!
//! Nothing in this module uses floating point or reads a clock; every
//! function is a pure function of its arguments.

mod amplification;
mod checked;
mod invariant;
mod unbonding;

pub use amplification::get_a;
pub use checked::CheckedArithmetic;
pub use invariant::{calculate_invariant, get_y};
pub use unbonding::{
    compute_unbonding_period, ONE_MINUTE, THIRTY_MINUTES, TWELVE_HOURS, TWENTY_FOUR_HOURS,
};

/// Number of assets in a StableSwap pool.
pub const N_COINS: u64 = 2;

/// Maximum Newton-Raphson iterations before declaring non-convergence.
pub const MAX_ITERATIONS: u32 = 255;

/// Scale applied to the amplification coefficient.
pub const A_PRECISION: u128 = 1_000_000;

/// Base of rate multipliers (`10^18` = 1.0).
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Denominator of the swap fee rate.
pub const FEE_DENOMINATOR: u64 = 10_000_000_000;
