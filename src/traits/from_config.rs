//! Generic construction trait for pool parameters.
//!
//! [`FromConfig`] provides a uniform interface for turning a validated
//! configuration struct into an algorithm's persisted parameter record.
//! The [`DefaultPoolFactory`](crate::factory::DefaultPoolFactory)
//! dispatches on [`PoolConfig`](crate::config::PoolConfig) and calls it:
//!
//! ```text
//! PoolConfig::Stableswap(cfg) => StableswapPool::from_config(&cfg)
//! ```
//!
//! # Validation Contract
//!
//! Implementations **must** validate the configuration.  A successfully
//! constructed record is in a valid initial state: no shares, ramp and
//! reward clocks at zero until the factory stamps the creation time.
//!
//! There is no blanket implementation; every pairing is explicit.

use crate::error::AmmError;

/// Builds a parameter record from a configuration.
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] (or a more specific
/// variant) if the configuration is invalid.
pub trait FromConfig<C> {
    /// Creates a new instance from `config`.
    ///
    /// # Errors
    ///
    /// Any validation error reported by the configuration.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
