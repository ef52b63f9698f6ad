//! Composite keys for position records.
//!
//! Key ordering is part of the protocol: prefix scans and the sweep walk
//! records in `Ord` order, so the field order of each key must not change.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Address;

/// Primary key of a [`BondedPosition`](crate::domain::BondedPosition):
/// `(pool_id, provider, timestamp)`.
///
/// Ordering groups all positions of one provider in one pool together,
/// oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BondedKey {
    /// Pool id.
    pub pool_id: u64,
    /// Liquidity provider.
    pub provider: Address,
    /// Creation time of the position.
    pub timestamp: i64,
}

impl BondedKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(pool_id: u64, provider: Address, timestamp: i64) -> Self {
        Self {
            pool_id,
            provider,
            timestamp,
        }
    }

    /// Inclusive bounds covering every position of `provider` in `pool_id`.
    #[must_use]
    pub const fn provider_range(pool_id: u64, provider: Address) -> (Self, Self) {
        (
            Self::new(pool_id, provider, i64::MIN),
            Self::new(pool_id, provider, i64::MAX),
        )
    }
}

impl fmt::Display for BondedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.pool_id, self.provider, self.timestamp)
    }
}

/// Primary key of an [`UnbondingPosition`](crate::domain::UnbondingPosition):
/// `(end_time, provider, pool_id)`.
///
/// Leading with the maturity time lets the sweep find every matured entry
/// with a single range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnbondingKey {
    /// Maturity time.
    pub end_time: i64,
    /// Liquidity provider.
    pub provider: Address,
    /// Pool id.
    pub pool_id: u64,
}

impl UnbondingKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(end_time: i64, provider: Address, pool_id: u64) -> Self {
        Self {
            end_time,
            provider,
            pool_id,
        }
    }

    /// Largest key with `end_time == time`; every key `<=` it has matured at `time`.
    #[must_use]
    pub const fn matured_upper_bound(time: i64) -> Self {
        Self::new(time, Address::from_bytes([0xff; 32]), u64::MAX)
    }
}

impl fmt::Display for UnbondingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.end_time, self.provider, self.pool_id)
    }
}

/// Key of per-provider aggregates and secondary indices: `(pool_id, provider)`.
pub type ProviderKey = (u64, Address);
