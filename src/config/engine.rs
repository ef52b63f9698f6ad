//! Engine-wide parameters.

use serde::{Deserialize, Serialize};

use crate::domain::{validate_denom, Address};
use crate::error::AmmError;

fn default_unbonding_block_interval() -> u64 {
    1
}

/// Engine-wide parameters, typically loaded from the host's genesis.
///
/// # Validation
///
/// - `base_denom` is well formed.
/// - `unbonding_block_interval > 0`.
///
/// # Examples
///
/// ```
/// use stableswap_engine::config::EngineConfig;
/// use stableswap_engine::domain::Address;
///
/// let cfg = EngineConfig::new("uusdn", Address::from_bytes([7u8; 32])).expect("valid");
/// assert_eq!(cfg.unbonding_block_interval(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    base_denom: String,
    protocol_fee_collector: Address,
    #[serde(default = "default_unbonding_block_interval")]
    unbonding_block_interval: u64,
    #[serde(default)]
    max_add_liquidity: u128,
}

impl EngineConfig {
    /// Creates a configuration with a sweep every block and no deposit cap.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidDenom`] if `base_denom` is malformed.
    pub fn new(base_denom: impl Into<String>, protocol_fee_collector: Address) -> Result<Self, AmmError> {
        let config = Self {
            base_denom: base_denom.into(),
            protocol_fee_collector,
            unbonding_block_interval: default_unbonding_block_interval(),
            max_add_liquidity: 0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the sweep interval in blocks.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `interval` is zero.
    pub fn with_unbonding_block_interval(mut self, interval: u64) -> Result<Self, AmmError> {
        self.unbonding_block_interval = interval;
        self.validate()?;
        Ok(self)
    }

    /// Caps a pool's base-denom liquidity after any deposit; zero disables the cap.
    #[must_use]
    pub const fn with_max_add_liquidity(mut self, cap: u128) -> Self {
        self.max_add_liquidity = cap;
        self
    }

    /// Validates all invariants.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::new`] and [`EngineConfig::with_unbonding_block_interval`].
    pub fn validate(&self) -> Result<(), AmmError> {
        validate_denom(&self.base_denom)?;
        if self.unbonding_block_interval == 0 {
            return Err(AmmError::InvalidConfiguration(
                "unbonding block interval must be positive",
            ));
        }
        Ok(())
    }

    /// Denom every pool is paired against.
    #[must_use]
    pub fn base_denom(&self) -> &str {
        &self.base_denom
    }

    /// Account receiving protocol fees.
    #[must_use]
    pub const fn protocol_fee_collector(&self) -> Address {
        self.protocol_fee_collector
    }

    /// Sweep cadence in blocks.
    #[must_use]
    pub const fn unbonding_block_interval(&self) -> u64 {
        self.unbonding_block_interval
    }

    /// Deposit cap on base-denom pool liquidity; zero means unlimited.
    #[must_use]
    pub const fn max_add_liquidity(&self) -> u128 {
        self.max_add_liquidity
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_rejected() {
        let Ok(cfg) = EngineConfig::new("uusdn", Address::zero()) else {
            panic!("valid config");
        };
        assert!(matches!(
            cfg.with_unbonding_block_interval(0),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn bad_base_denom_rejected() {
        assert!(EngineConfig::new("", Address::zero()).is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = format!(
            r#"{{"base_denom":"uusdn","protocol_fee_collector":{:?}}}"#,
            [1u8; 32]
        );
        let Ok(cfg) = serde_json::from_str::<EngineConfig>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(cfg.unbonding_block_interval(), 1);
        assert_eq!(cfg.max_add_liquidity(), 0);
        assert_eq!(cfg.protocol_fee_collector(), Address::from_bytes([1u8; 32]));
    }
}
