//! Top-level pool configuration enum.
//!
//! [`PoolConfig`] is the declarative blueprint for creating a pool.  Each
//! variant wraps an algorithm-specific configuration struct.
//!
//! # Factory Integration
//!
//! ```text
//! match config {
//!     PoolConfig::Stableswap(cfg) => StableswapController::from_config(&cfg),
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::StableswapConfig;
use crate::domain::Algorithm;
use crate::error::AmmError;

/// Configuration enum over supported pool algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolConfig {
    /// StableSwap configuration (Curve style).
    Stableswap(StableswapConfig),
}

impl PoolConfig {
    /// Validates the inner configuration.
    ///
    /// # Errors
    ///
    /// Returns the same [`AmmError`] the inner `validate()` would return.
    pub fn validate(&self) -> Result<(), AmmError> {
        match self {
            Self::Stableswap(cfg) => cfg.validate(),
        }
    }

    /// Returns the algorithm this configuration creates.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Stableswap(_) => Algorithm::Stableswap,
        }
    }

    /// Returns `true` if this is a [`Stableswap`](Self::Stableswap) variant.
    #[must_use]
    pub const fn is_stableswap(&self) -> bool {
        matches!(self, Self::Stableswap(_))
    }
}

impl core::fmt::Display for PoolConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stableswap(_) => write!(f, "Stableswap"),
        }
    }
}
