//! Configuration types for pools and for the engine itself.
//!
//! [`PoolConfig`] is the declarative blueprint passed to the factory;
//! [`StableswapConfig`] holds the StableSwap parameters it wraps.
//! [`EngineConfig`] carries engine-wide parameters such as the base denom
//! and the unbonding sweep cadence.

mod engine;
mod pool_config;
mod stableswap;

pub use engine::EngineConfig;
pub use pool_config::PoolConfig;
pub use stableswap::{validate_amplification, validate_rate_multipliers, StableswapConfig, MAX_A};
