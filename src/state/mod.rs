//! Typed, ordered key-value state for pools, positions and aggregates.
//!
//! [`State`] is an arena of ordered maps keyed by explicit composite keys
//! ([`BondedKey`], [`UnbondingKey`]).  Secondary indices (positions by
//! provider) are separate maps from index key to primary-key sets and are
//! updated in the same call as the primary write, so they can never
//! diverge from the records they index.
//!
//! # Aggregates
//!
//! `PoolTotalUnbondingShares`, `UserTotalBondedShares` and
//! `UserTotalUnbondingShares` are running sums maintained alongside every
//! position mutation.  They are *not* re-derived on read;
//! [`State::check_invariants`] recomputes them from the records and reports
//! the first disagreement.
//!
//! # Transactions
//!
//! `State` is `Clone`.  Callers obtain all-or-nothing semantics through
//! [`Context::atomic`](crate::context::Context::atomic), which snapshots
//! state and bank and restores both when the wrapped operation fails.

mod bank;
mod keys;

use std::collections::{BTreeMap, BTreeSet};

pub use bank::{Bank, MemoryBank};
pub use keys::{BondedKey, ProviderKey, UnbondingKey};

use crate::domain::{Address, BondedPosition, Dec, Pool, StableswapPool, UnbondingPosition};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Engine state held in the host's transactional store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    next_pool_id: u64,
    pools: BTreeMap<u64, Pool>,
    stableswap_pools: BTreeMap<u64, StableswapPool>,

    bonded_positions: BTreeMap<BondedKey, BondedPosition>,
    unbonding_positions: BTreeMap<UnbondingKey, UnbondingPosition>,

    // secondary indices
    bonded_by_provider: BTreeMap<Address, BTreeSet<BondedKey>>,
    unbonding_by_provider: BTreeMap<ProviderKey, BTreeSet<UnbondingKey>>,

    // aggregates
    pool_total_unbonding_shares: BTreeMap<u64, Dec>,
    user_total_bonded_shares: BTreeMap<ProviderKey, Dec>,
    user_total_unbonding_shares: BTreeMap<ProviderKey, Dec>,
}

impl State {
    /// Creates empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- pools ----------------------------------------------------------------

    /// Reserves and returns the next pool id.
    pub fn next_pool_id(&mut self) -> u64 {
        let id = self.next_pool_id;
        self.next_pool_id = self.next_pool_id.saturating_add(1);
        id
    }

    /// Returns the pool header.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no pool has this id.
    pub fn pool(&self, pool_id: u64) -> Result<&Pool, AmmError> {
        self.pools.get(&pool_id).ok_or(AmmError::PoolNotFound(pool_id))
    }

    /// Inserts or replaces a pool header.
    pub fn set_pool(&mut self, pool: Pool) {
        self.pools.insert(pool.id, pool);
    }

    /// Iterates all pools in id order.
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    /// Returns the StableSwap parameters of a pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if the pool has no StableSwap record.
    pub fn stableswap_pool(&self, pool_id: u64) -> Result<&StableswapPool, AmmError> {
        self.stableswap_pools
            .get(&pool_id)
            .ok_or(AmmError::PoolNotFound(pool_id))
    }

    /// Inserts or replaces StableSwap parameters.
    pub fn set_stableswap_pool(&mut self, pool_id: u64, params: StableswapPool) {
        self.stableswap_pools.insert(pool_id, params);
    }

    // -- bonded positions -----------------------------------------------------

    /// Returns `true` if a bonded position exists at `key`.
    #[must_use]
    pub fn has_bonded_position(&self, key: &BondedKey) -> bool {
        self.bonded_positions.contains_key(key)
    }

    /// Returns the bonded position at `key`.
    #[must_use]
    pub fn bonded_position(&self, key: &BondedKey) -> Option<&BondedPosition> {
        self.bonded_positions.get(key)
    }

    /// Writes a bonded position and indexes it under its provider.
    pub fn set_bonded_position(&mut self, key: BondedKey, position: BondedPosition) {
        self.bonded_by_provider
            .entry(key.provider)
            .or_default()
            .insert(key);
        self.bonded_positions.insert(key, position);
    }

    /// Deletes a bonded position and its index entry.
    pub fn remove_bonded_position(&mut self, key: &BondedKey) -> Option<BondedPosition> {
        if let Some(set) = self.bonded_by_provider.get_mut(&key.provider) {
            set.remove(key);
            if set.is_empty() {
                self.bonded_by_provider.remove(&key.provider);
            }
        }
        self.bonded_positions.remove(key)
    }

    /// Bonded positions of `provider` in `pool_id`, oldest first.
    pub fn bonded_positions_by_provider(
        &self,
        pool_id: u64,
        provider: Address,
    ) -> impl Iterator<Item = (&BondedKey, &BondedPosition)> {
        let (lo, hi) = BondedKey::provider_range(pool_id, provider);
        self.bonded_positions.range(lo..=hi)
    }

    /// Bonded positions of `provider` across every pool.
    pub fn bonded_positions_of(
        &self,
        provider: &Address,
    ) -> impl Iterator<Item = (&BondedKey, &BondedPosition)> {
        self.bonded_by_provider
            .get(provider)
            .into_iter()
            .flatten()
            .filter_map(|key| self.bonded_positions.get_key_value(key))
    }

    /// Every bonded position, in key order.
    pub fn bonded_positions(&self) -> impl Iterator<Item = (&BondedKey, &BondedPosition)> {
        self.bonded_positions.iter()
    }

    // -- unbonding positions --------------------------------------------------

    /// Returns `true` if an unbonding position exists at `key`.
    #[must_use]
    pub fn has_unbonding_position(&self, key: &UnbondingKey) -> bool {
        self.unbonding_positions.contains_key(key)
    }

    /// Writes an unbonding position and indexes it under `(pool, provider)`.
    pub fn set_unbonding_position(&mut self, key: UnbondingKey, position: UnbondingPosition) {
        self.unbonding_by_provider
            .entry((key.pool_id, key.provider))
            .or_default()
            .insert(key);
        self.unbonding_positions.insert(key, position);
    }

    /// Deletes an unbonding position and its index entry.
    pub fn remove_unbonding_position(&mut self, key: &UnbondingKey) -> Option<UnbondingPosition> {
        let index_key = (key.pool_id, key.provider);
        if let Some(set) = self.unbonding_by_provider.get_mut(&index_key) {
            set.remove(key);
            if set.is_empty() {
                self.unbonding_by_provider.remove(&index_key);
            }
        }
        self.unbonding_positions.remove(key)
    }

    /// Unbonding positions of `provider` in `pool_id`, earliest maturity first.
    pub fn unbonding_positions_by_provider(
        &self,
        pool_id: u64,
        provider: Address,
    ) -> impl Iterator<Item = (&UnbondingKey, &UnbondingPosition)> {
        self.unbonding_by_provider
            .get(&(pool_id, provider))
            .into_iter()
            .flatten()
            .filter_map(|key| self.unbonding_positions.get_key_value(key))
    }

    /// Unbonding positions of `provider` across every pool, earliest maturity first.
    #[must_use]
    pub fn unbonding_positions_of(&self, provider: &Address) -> Vec<(UnbondingKey, UnbondingPosition)> {
        let mut out: Vec<_> = self
            .unbonding_by_provider
            .iter()
            .filter(|((_, owner), _)| owner == provider)
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(|key| self.unbonding_positions.get(key).map(|p| (*key, p.clone())))
            .collect();
        out.sort_by_key(|(key, _)| *key);
        out
    }

    /// Every unbonding position with `end_time <= time`, in key order.
    #[must_use]
    pub fn matured_unbondings(&self, time: i64) -> Vec<(UnbondingKey, UnbondingPosition)> {
        self.unbonding_positions
            .range(..=UnbondingKey::matured_upper_bound(time))
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }

    /// Every unbonding position, in key order.
    pub fn unbonding_positions(&self) -> impl Iterator<Item = (&UnbondingKey, &UnbondingPosition)> {
        self.unbonding_positions.iter()
    }

    // -- aggregates -----------------------------------------------------------

    /// Shares currently unbonding in `pool_id`.
    #[must_use]
    pub fn pool_total_unbonding_shares(&self, pool_id: u64) -> Dec {
        self.pool_total_unbonding_shares
            .get(&pool_id)
            .copied()
            .unwrap_or_default()
    }

    /// Shares bonded by `provider` in `pool_id`, including queued unbondings.
    #[must_use]
    pub fn user_total_bonded_shares(&self, pool_id: u64, provider: Address) -> Dec {
        self.user_total_bonded_shares
            .get(&(pool_id, provider))
            .copied()
            .unwrap_or_default()
    }

    /// Shares `provider` has queued for unbonding in `pool_id`.
    #[must_use]
    pub fn user_total_unbonding_shares(&self, pool_id: u64, provider: Address) -> Dec {
        self.user_total_unbonding_shares
            .get(&(pool_id, provider))
            .copied()
            .unwrap_or_default()
    }

    /// Adds `delta` (possibly negative) to the pool unbonding total.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the total would turn negative.
    pub fn adjust_pool_total_unbonding_shares(&mut self, pool_id: u64, delta: Dec) -> Result<(), AmmError> {
        adjust(&mut self.pool_total_unbonding_shares, pool_id, delta)
    }

    /// Adds `delta` (possibly negative) to a provider's bonded total.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the total would turn negative.
    pub fn adjust_user_total_bonded_shares(
        &mut self,
        pool_id: u64,
        provider: Address,
        delta: Dec,
    ) -> Result<(), AmmError> {
        adjust(&mut self.user_total_bonded_shares, (pool_id, provider), delta)
    }

    /// Adds `delta` (possibly negative) to a provider's unbonding total.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the total would turn negative.
    pub fn adjust_user_total_unbonding_shares(
        &mut self,
        pool_id: u64,
        provider: Address,
        delta: Dec,
    ) -> Result<(), AmmError> {
        adjust(&mut self.user_total_unbonding_shares, (pool_id, provider), delta)
    }

    // -- consistency ------------------------------------------------------------

    /// Recomputes every aggregate from the position records.
    ///
    /// Checks, per provider and pool:
    ///
    /// - `UserTotalBondedShares == Σ bonded balances`,
    /// - `UserTotalUnbondingShares == Σ unbonding shares`,
    ///
    /// per pool:
    ///
    /// - `PoolTotalUnbondingShares == Σ unbonding shares`,
    /// - `total_shares == Σ UserTotalBondedShares`,
    ///
    /// and that both secondary indices reference exactly the primary records.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::BookkeepingMismatch`] naming the first aggregate
    /// that disagrees.
    pub fn check_invariants(&self) -> Result<(), AmmError> {
        let mut bonded: BTreeMap<ProviderKey, Dec> = BTreeMap::new();
        for (key, position) in &self.bonded_positions {
            if position.balance.is_negative() {
                return Err(AmmError::BookkeepingMismatch("negative bonded balance persisted"));
            }
            add_into(&mut bonded, (key.pool_id, key.provider), position.balance)?;
        }

        let mut unbonding: BTreeMap<ProviderKey, Dec> = BTreeMap::new();
        let mut pool_unbonding: BTreeMap<u64, Dec> = BTreeMap::new();
        for (key, position) in &self.unbonding_positions {
            add_into(&mut unbonding, (key.pool_id, key.provider), position.shares)?;
            add_into(&mut pool_unbonding, key.pool_id, position.shares)?;
        }

        if non_zero(&bonded) != non_zero(&self.user_total_bonded_shares) {
            return Err(AmmError::BookkeepingMismatch("user total bonded shares"));
        }
        if non_zero(&unbonding) != non_zero(&self.user_total_unbonding_shares) {
            return Err(AmmError::BookkeepingMismatch("user total unbonding shares"));
        }
        if non_zero(&pool_unbonding) != non_zero(&self.pool_total_unbonding_shares) {
            return Err(AmmError::BookkeepingMismatch("pool total unbonding shares"));
        }

        for (pool_id, params) in &self.stableswap_pools {
            let mut sum = Dec::ZERO;
            for ((pid, _), shares) in &bonded {
                if pid == pool_id {
                    sum = sum.safe_add(shares)?;
                }
            }
            if sum != params.total_shares {
                return Err(AmmError::BookkeepingMismatch("pool total shares"));
            }
        }

        let indexed_bonded: usize = self.bonded_by_provider.values().map(BTreeSet::len).sum();
        let indexed_unbonding: usize = self.unbonding_by_provider.values().map(BTreeSet::len).sum();
        if indexed_bonded != self.bonded_positions.len()
            || indexed_unbonding != self.unbonding_positions.len()
        {
            return Err(AmmError::BookkeepingMismatch("secondary index size"));
        }
        Ok(())
    }
}

fn adjust<K: Ord>(map: &mut BTreeMap<K, Dec>, key: K, delta: Dec) -> Result<(), AmmError> {
    let current = map.get(&key).copied().unwrap_or_default();
    let next = current.safe_add(&delta)?;
    if next.is_negative() {
        return Err(AmmError::Underflow("aggregate would turn negative"));
    }
    if next.is_zero() {
        map.remove(&key);
    } else {
        map.insert(key, next);
    }
    Ok(())
}

fn add_into<K: Ord>(map: &mut BTreeMap<K, Dec>, key: K, value: Dec) -> Result<(), AmmError> {
    let slot = map.entry(key).or_default();
    *slot = slot.safe_add(&value)?;
    Ok(())
}

fn non_zero<K: Ord + Clone>(map: &BTreeMap<K, Dec>) -> BTreeMap<K, Dec> {
    map.iter()
        .filter(|(_, v)| !v.is_zero())
        .map(|(k, v)| (k.clone(), *v))
        .collect()
}
