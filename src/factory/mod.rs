//! Pool registration via the factory pattern.
//!
//! The [`DefaultPoolFactory`] turns a [`PoolConfig`] into stored pool
//! records, validating configuration and dispatching to the algorithm's
//! parameter constructor based on the config variant.
//!
//! # Feature Gating
//!
//! Each match arm is gated behind its algorithm's feature flag.  A config
//! variant whose feature is not enabled yields
//! [`AmmError::InvalidConfiguration`].
//!
//! [`PoolConfig`]: crate::config::PoolConfig
//! [`AmmError::InvalidConfiguration`]: crate::error::AmmError::InvalidConfiguration

mod default_factory;

pub use default_factory::DefaultPoolFactory;
