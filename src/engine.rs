//! Host-facing entry points.
//!
//! [`Engine`] owns the engine configuration, the keyed [`State`] and the
//! [`Bank`], and exposes every state transition as one all-or-nothing
//! call.  Each call receives the current [`BlockInfo`] explicitly; the
//! engine never reads a clock.
//!
//! # Atomicity
//!
//! Every write runs inside [`Context::atomic`]: a failure restores state
//! and balances to exactly what they were before the call.  The unbonding
//! sweep applies this per entry, so one failed settlement never blocks the
//! others.

use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};

use crate::config::{EngineConfig, PoolConfig};
use crate::context::Context;
use crate::domain::{
    Address, BlockInfo, BondedPosition, Coin, Dec, Pool, Rate, Route, SwapCommitment,
    UnbondingPosition,
};
use crate::error::AmmError;
use crate::factory::DefaultPoolFactory;
use crate::pools::Controller;
use crate::state::{Bank, BondedKey, State, UnbondingKey};
use crate::traits::{LiquidityController, SwapController};

/// The StableSwap engine bound to its state and bank.
///
/// # Examples
///
/// ```
/// use stableswap_engine::config::EngineConfig;
/// use stableswap_engine::domain::Address;
/// use stableswap_engine::engine::Engine;
/// use stableswap_engine::state::MemoryBank;
///
/// let config = EngineConfig::new("uusdn", Address::from_bytes([9u8; 32])).expect("valid");
/// let engine = Engine::new(config, MemoryBank::new()).expect("engine");
/// assert_eq!(engine.state().pools().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<B> {
    config: EngineConfig,
    state: State,
    bank: B,
}

impl<B: Bank + Clone> Engine<B> {
    /// Creates an engine with empty state.
    ///
    /// # Errors
    ///
    /// Returns any error from [`EngineConfig::validate`].
    pub fn new(config: EngineConfig, bank: B) -> Result<Self, AmmError> {
        Self::with_state(config, State::new(), bank)
    }

    /// Creates an engine over previously exported state.
    ///
    /// # Errors
    ///
    /// - Any error from [`EngineConfig::validate`].
    /// - [`AmmError::BookkeepingMismatch`] if `state` is inconsistent.
    pub fn with_state(config: EngineConfig, state: State, bank: B) -> Result<Self, AmmError> {
        config.validate()?;
        state.check_invariants()?;
        Ok(Self {
            config,
            state,
            bank,
        })
    }

    /// Engine parameters.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of every record and aggregate.
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// The token-transfer collaborator.
    #[must_use]
    pub const fn bank(&self) -> &B {
        &self.bank
    }

    /// Mutable access to the bank, for hosts that mint or burn externally.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Splits the engine back into its parts.
    pub fn into_parts(self) -> (EngineConfig, State, B) {
        (self.config, self.state, self.bank)
    }

    fn execute<T, F>(&mut self, block: BlockInfo, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Context<'_, B>) -> Result<T, AmmError>,
    {
        let mut ctx = Context::new(&mut self.state, &mut self.bank, &self.config, block);
        let result = ctx.atomic(f);
        if let Err(e) = &result {
            if e.is_invariant_violation() {
                error!(height = block.height, error = %e, "operation aborted on invariant violation");
            } else {
                debug!(height = block.height, error = %e, "operation rejected");
            }
        }
        result
    }

    // -- pool administration ----------------------------------------------------

    /// Registers a new pool and returns its id.
    ///
    /// # Errors
    ///
    /// Any error from [`DefaultPoolFactory::create`].
    pub fn create_pool(&mut self, config: &PoolConfig, block: BlockInfo) -> Result<u64, AmmError> {
        self.execute(block, |ctx| {
            let now = ctx.now();
            let controller =
                DefaultPoolFactory::create(ctx.state, ctx.config.base_denom(), config, now)?;
            Ok(controller.pool().id)
        })
    }

    /// Replaces fees and rate multipliers and starts a new amplification ramp.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for an unknown pool.
    /// - Any validation error of the new configuration.
    pub fn update_pool(
        &mut self,
        pool_id: u64,
        config: &PoolConfig,
        block: BlockInfo,
    ) -> Result<(), AmmError> {
        self.execute(block, |ctx| {
            let mut controller = Controller::load(ctx.state, pool_id)?;
            controller.update(ctx, config)
        })
    }

    /// Pauses or resumes swaps and deposits on a pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn set_paused(&mut self, pool_id: u64, paused: bool, block: BlockInfo) -> Result<(), AmmError> {
        self.execute(block, |ctx| {
            let mut controller = Controller::load(ctx.state, pool_id)?;
            controller.set_paused(ctx, paused);
            Ok(())
        })
    }

    // -- swaps ------------------------------------------------------------------

    /// Swaps `input` along `routes`, requiring at least `min` at the end.
    ///
    /// Each hop trades the previous hop's output.  Returns one commitment
    /// per hop.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidRoute`] for an empty or inconsistent route, or
    ///   when the route does not end in `min`'s denom.
    /// - [`AmmError::SlippageExceeded`] if the final output is below `min`.
    /// - Any pricing, pause or bank error of an individual hop.
    pub fn swap(
        &mut self,
        signer: &Address,
        input: &Coin,
        routes: &[Route],
        min: &Coin,
        block: BlockInfo,
    ) -> Result<Vec<SwapCommitment>, AmmError> {
        input.validate_positive()?;
        self.check_route(input.denom(), routes)?;
        if routes.last().map(|r| r.denom_to.as_str()) != Some(min.denom()) {
            return Err(AmmError::InvalidRoute("route must end in the minimum's denom"));
        }

        self.execute(block, |ctx| {
            let mut running = input.clone();
            let mut commitments = Vec::with_capacity(routes.len());
            for hop in routes {
                let mut controller = Controller::load(ctx.state, hop.pool_id)?;
                let commitment = controller.swap(ctx, signer, &running, &hop.denom_to)?;
                running = commitment.output().clone();
                commitments.push(commitment);
            }
            if running.amount() < min.amount() {
                return Err(AmmError::SlippageExceeded("output below requested minimum"));
            }
            info!(
                signer = %signer,
                input = %input,
                output = %running,
                hops = commitments.len(),
                "routed swap executed"
            );
            Ok(commitments)
        })
    }

    /// Prices a routed swap without moving funds.
    ///
    /// Every hop is quoted against current liquidity; a route visiting the
    /// same pool twice does not see its own earlier hops.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::swap`], minus slippage and bank errors.
    pub fn simulate_swap(
        &self,
        input: &Coin,
        routes: &[Route],
        block: BlockInfo,
    ) -> Result<Vec<SwapCommitment>, AmmError> {
        input.validate_positive()?;
        self.check_route(input.denom(), routes)?;

        let mut running = input.clone();
        let mut commitments = Vec::with_capacity(routes.len());
        for hop in routes {
            let controller = Controller::load(&self.state, hop.pool_id)?;
            let commitment =
                controller.simulate_swap(&self.bank, &running, &hop.denom_to, block.time)?;
            running = commitment.output().clone();
            commitments.push(commitment);
        }
        Ok(commitments)
    }

    fn check_route(&self, denom_from: &str, routes: &[Route]) -> Result<(), AmmError> {
        if routes.is_empty() {
            return Err(AmmError::InvalidRoute("route is empty"));
        }
        let mut current = denom_from;
        for hop in routes {
            let pool = self.state.pool(hop.pool_id)?;
            let in_pool = |denom: &str| denom == self.config.base_denom() || denom == pool.pair;
            if !in_pool(current) {
                return Err(AmmError::InvalidRoute("hop input denom is not part of the pool"));
            }
            if !in_pool(&hop.denom_to) {
                return Err(AmmError::InvalidRoute("hop output denom is not part of the pool"));
            }
            if hop.denom_to == current {
                return Err(AmmError::InvalidRoute("hop swaps a denom for itself"));
            }
            current = &hop.denom_to;
        }
        Ok(())
    }

    /// Fee-less rates for one pool, or for every non-empty pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] for an unknown pool.
    /// - [`AmmError::EmptyPool`] if the requested pool has no liquidity.
    pub fn rates(&self, pool_id: Option<u64>, block: BlockInfo) -> Result<Vec<Rate>, AmmError> {
        if let Some(id) = pool_id {
            return Controller::load(&self.state, id)?.rates(&self.bank, block.time);
        }
        let mut rates = Vec::new();
        for pool in self.state.pools() {
            match Controller::load(&self.state, pool.id)?.rates(&self.bank, block.time) {
                Ok(mut r) => rates.append(&mut r),
                Err(AmmError::EmptyPool) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(rates)
    }

    // -- liquidity --------------------------------------------------------------

    /// Deposits `coins` into `pool_id` and opens a bonded position.
    ///
    /// # Errors
    ///
    /// See [`LiquidityController::add_liquidity`].
    pub fn add_liquidity(
        &mut self,
        provider: &Address,
        pool_id: u64,
        coins: &[Coin],
        block: BlockInfo,
    ) -> Result<BondedPosition, AmmError> {
        self.execute(block, |ctx| {
            let mut controller = Controller::load(ctx.state, pool_id)?;
            controller.add_liquidity(ctx, provider, coins)
        })
    }

    /// Queues `percentage` (0 to 100) of the provider's available shares.
    ///
    /// # Errors
    ///
    /// See [`LiquidityController::remove_liquidity`].
    pub fn remove_liquidity(
        &mut self,
        provider: &Address,
        pool_id: u64,
        percentage: Dec,
        block: BlockInfo,
    ) -> Result<UnbondingPosition, AmmError> {
        self.execute(block, |ctx| {
            let mut controller = Controller::load(ctx.state, pool_id)?;
            controller.remove_liquidity(ctx, provider, percentage)
        })
    }

    /// Settles every unbonding matured at `block.time`.
    ///
    /// Entries are settled independently and atomically; a failed entry is
    /// logged, left in place and skipped.  Returns the number settled.
    ///
    /// # Cost
    ///
    /// Each entry runs under its own [`Context::atomic`] snapshot, which
    /// clones the whole [`State`] and bank, so a sweep costs
    /// O(matured entries × state size).  Keep the sweep interval short
    /// enough that the matured set per sweep stays small.
    pub fn sweep_unbondings(&mut self, block: BlockInfo) -> usize {
        let matured = self.state.matured_unbondings(block.time);
        let pending = matured.len();
        let mut settled = 0;
        for (key, position) in matured {
            let result = self.execute(block, |ctx| {
                let mut controller = Controller::load(ctx.state, key.pool_id)?;
                controller.settle_unbonding(ctx, &key, &position)
            });
            match result {
                Ok(()) => settled += 1,
                Err(e) => warn!(
                    pool_id = key.pool_id,
                    provider = %key.provider,
                    end_time = key.end_time,
                    error = %e,
                    "unbonding entry skipped"
                ),
            }
        }
        if pending > 0 {
            info!(height = block.height, pending, settled, "unbonding sweep finished");
        }
        settled
    }

    /// End-of-block hook: sweeps when `height % unbonding_block_interval == 0`.
    ///
    /// Returns the number of settled entries (zero when the sweep does not fire).
    pub fn end_block(&mut self, block: BlockInfo) -> usize {
        if block.fires_every(self.config.unbonding_block_interval()) {
            self.sweep_unbondings(block)
        } else {
            0
        }
    }

    // -- rewards and fees -----------------------------------------------------------

    /// Pays `provider` the rewards accrued in `pool_id`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoRewards`] if nothing has accrued.
    /// - [`AmmError::PeriodTooShort`] if a reward window has zero length.
    pub fn claim_rewards(
        &mut self,
        provider: &Address,
        pool_id: u64,
        block: BlockInfo,
    ) -> Result<Vec<Coin>, AmmError> {
        self.execute(block, |ctx| {
            let mut controller = Controller::load(ctx.state, pool_id)?;
            let paid = controller.claim_rewards(ctx, provider)?;
            if paid.is_empty() {
                return Err(AmmError::NoRewards);
            }
            info!(pool_id, provider = %provider, coins = paid.len(), "rewards claimed");
            Ok(paid)
        })
    }

    /// Moves every protocol fee held by the collector to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NoRewards`] if the collector holds no pool denom.
    pub fn withdraw_protocol_fees(
        &mut self,
        recipient: &Address,
        block: BlockInfo,
    ) -> Result<Vec<Coin>, AmmError> {
        let collector = self.config.protocol_fee_collector();
        let denoms: BTreeSet<&str> = core::iter::once(self.config.base_denom())
            .chain(self.state.pools().map(|p| p.pair.as_str()))
            .collect();
        let fees: Vec<Coin> = denoms
            .into_iter()
            .map(|d| Coin::new(d, self.bank.balance(&collector, d)))
            .filter(|c| !c.is_zero())
            .collect();
        if fees.is_empty() {
            return Err(AmmError::NoRewards);
        }
        self.execute(block, |ctx| {
            ctx.bank.transfer(&collector, recipient, &fees)?;
            info!(recipient = %recipient, coins = fees.len(), "protocol fees withdrawn");
            Ok(fees)
        })
    }

    // -- queries ----------------------------------------------------------------

    /// Recomputes every aggregate from the position records.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::BookkeepingMismatch`] on the first disagreement.
    pub fn check_invariants(&self) -> Result<(), AmmError> {
        self.state.check_invariants()
    }

    /// Controller for `pool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn controller(&self, pool_id: u64) -> Result<Controller, AmmError> {
        Controller::load(&self.state, pool_id)
    }

    /// Pool header.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn pool(&self, pool_id: u64) -> Result<&Pool, AmmError> {
        self.state.pool(pool_id)
    }

    /// Raw liquidity of `pool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn liquidity(&self, pool_id: u64) -> Result<Vec<Coin>, AmmError> {
        Ok(self.controller(pool_id)?.liquidity(&self.bank))
    }

    /// Amplification of `pool_id` at `time`, scaled by
    /// [`A_PRECISION`](crate::math::A_PRECISION).
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] for an unknown pool.
    pub fn current_a(&self, pool_id: u64, time: i64) -> Result<u128, AmmError> {
        Ok(self.controller(pool_id)?.current_a(time))
    }

    /// Bonded positions of `provider`, optionally restricted to one pool.
    #[must_use]
    pub fn bonded_positions(
        &self,
        provider: &Address,
        pool_id: Option<u64>,
    ) -> Vec<(BondedKey, BondedPosition)> {
        let clone = |(k, p): (&BondedKey, &BondedPosition)| (*k, p.clone());
        match pool_id {
            Some(id) => self
                .state
                .bonded_positions_by_provider(id, *provider)
                .map(clone)
                .collect(),
            None => self.state.bonded_positions_of(provider).map(clone).collect(),
        }
    }

    /// Unbonding positions of `provider`, optionally restricted to one pool.
    #[must_use]
    pub fn unbonding_positions(
        &self,
        provider: &Address,
        pool_id: Option<u64>,
    ) -> Vec<(UnbondingKey, UnbondingPosition)> {
        match pool_id {
            Some(id) => self
                .state
                .unbonding_positions_by_provider(id, *provider)
                .map(|(k, p)| (*k, p.clone()))
                .collect(),
            None => self.state.unbonding_positions_of(provider),
        }
    }
}
