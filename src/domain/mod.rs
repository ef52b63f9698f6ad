//! Fundamental domain value types used throughout the engine.
//!
//! This module contains the value types and persisted records that model
//! the AMM domain: fixed-point decimals, addresses, coins, pools,
//! positions, routes, rate quotes and swap commitments.

mod address;
mod block;
mod coin;
mod dec;
mod pool;
mod position;
mod rate;
mod route;
mod swap_result;

pub use address::Address;
pub use block::BlockInfo;
pub use coin::{amount_of, validate_denom, Coin};
pub use dec::Dec;
pub use pool::{Algorithm, Pool, RateMultiplier, StableswapPool};
pub use position::{BondedPosition, UnbondingPosition};
pub use rate::Rate;
pub use route::Route;
pub use swap_result::SwapCommitment;
