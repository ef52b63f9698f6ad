//! Default pool factory implementation.

use tracing::info;

use crate::config::PoolConfig;
use crate::domain::{Address, Pool, StableswapPool};
use crate::error::AmmError;
use crate::pools::Controller;
use crate::state::State;

#[cfg(feature = "stableswap")]
use crate::pools::StableswapController;
#[cfg(feature = "stableswap")]
use crate::traits::FromConfig;

/// Stateless factory for registering pools from configuration.
///
/// `DefaultPoolFactory` is the single entry point for creating a pool.  It
/// validates the [`PoolConfig`], checks that the first denom is the
/// engine's base denom, allocates the next pool id, derives the pool's
/// module account, stores the header and parameters, and returns the
/// pool's [`Controller`].
///
/// # Example
///
/// ```rust
/// use stableswap_engine::config::{PoolConfig, StableswapConfig};
/// use stableswap_engine::domain::{Dec, RateMultiplier};
/// use stableswap_engine::factory::DefaultPoolFactory;
/// use stableswap_engine::state::State;
/// use stableswap_engine::traits::SwapController;
///
/// let one = 1_000_000_000_000_000_000u128;
/// let cfg = StableswapConfig::new(
///     50,
///     2_500_000,
///     Dec::ZERO,
///     1_000,
///     1_000,
///     0,
///     [RateMultiplier::new("uusdn", one), RateMultiplier::new("uusdc", one)],
/// )
/// .expect("valid config");
///
/// let mut state = State::new();
/// let pool = DefaultPoolFactory::create(&mut state, "uusdn", &PoolConfig::Stableswap(cfg), 0)
///     .expect("pool created");
/// assert_eq!(pool.pool().pair, "uusdc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultPoolFactory;

impl DefaultPoolFactory {
    /// Registers a new pool created at `now`.
    ///
    /// # Flow
    ///
    /// 1. Validate the configuration via [`PoolConfig::validate`].
    /// 2. Check the first denom against `base_denom`.
    /// 3. Build the algorithm parameters through [`FromConfig`], stamping
    ///    the ramp start and reward clock with `now`.
    /// 4. Allocate the id, store header and parameters.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidDenom`] if the first denom is not `base_denom`.
    /// - [`AmmError::InvalidConfiguration`] if the configuration is invalid
    ///   or its algorithm's feature is not enabled.
    pub fn create(
        state: &mut State,
        base_denom: &str,
        config: &PoolConfig,
        now: i64,
    ) -> Result<Controller, AmmError> {
        config.validate()?;

        match config {
            #[cfg(feature = "stableswap")]
            PoolConfig::Stableswap(cfg) => {
                if cfg.rate_multipliers()[0].denom != base_denom {
                    return Err(AmmError::InvalidDenom("first pool denom must be the base denom"));
                }
                let mut params = StableswapPool::from_config(cfg)?;
                params.initial_a_time = now;
                params.initial_rewards_time = now;

                let pool = Self::register(state, config, cfg.pair_denom());
                state.set_stableswap_pool(pool.id, params.clone());
                info!(
                    pool_id = pool.id,
                    pair = %pool.pair,
                    algorithm = %pool.algorithm,
                    "pool created"
                );
                Ok(Controller::Stableswap(Box::new(StableswapController::new(
                    pool, params,
                ))))
            }

            // Catch-all for config variants whose algorithm feature is disabled.
            #[allow(unreachable_patterns)]
            _ => Err(AmmError::InvalidConfiguration(
                "requested pool algorithm is not enabled (missing feature flag)",
            )),
        }
    }

    fn register(state: &mut State, config: &PoolConfig, pair: &str) -> Pool {
        let id = state.next_pool_id();
        let pool = Pool {
            id,
            address: Address::pool_account(id),
            algorithm: config.algorithm(),
            pair: pair.to_owned(),
            paused: false,
        };
        state.set_pool(pool.clone());
        pool
    }
}
