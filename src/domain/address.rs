//! Ledger account address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A chain-agnostic account address.
///
/// Wraps a fixed-size `[u8; 32]` byte array.  All 32-byte sequences are
/// considered valid, so construction is infallible.  Ordering is
/// lexicographic over the bytes, which makes addresses usable inside
/// ordered composite keys.
///
/// # Examples
///
/// ```
/// use stableswap_engine::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

/// Tag bytes for engine-owned module accounts.
const POOL_ACCOUNT_TAG: &[u8; 8] = b"ss/pool\0";
const REWARDS_ACCOUNT_TAG: &[u8; 8] = b"ss/rwds\0";

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the all-zero address.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Deterministic account that holds a pool's liquidity.
    #[must_use]
    pub const fn pool_account(pool_id: u64) -> Self {
        Self::module_account(POOL_ACCOUNT_TAG, pool_id)
    }

    /// Deterministic account that accumulates a pool's rewards fees.
    #[must_use]
    pub const fn rewards_account(pool_id: u64) -> Self {
        Self::module_account(REWARDS_ACCOUNT_TAG, pool_id)
    }

    const fn module_account(tag: &[u8; 8], pool_id: u64) -> Self {
        let mut bytes = [0u8; 32];
        let id = pool_id.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[i] = tag[i];
            bytes[24 + i] = id[i];
            i += 1;
        }
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; 32];
        assert_eq!(Address::from_bytes(bytes).as_bytes(), bytes);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let lo = Address::from_bytes([0u8; 32]);
        let hi = Address::from_bytes([1u8; 32]);
        assert!(lo < hi);
    }

    #[test]
    fn module_accounts_are_distinct_per_pool_and_purpose() {
        assert_ne!(Address::pool_account(0), Address::pool_account(1));
        assert_ne!(Address::pool_account(3), Address::rewards_account(3));
        assert_eq!(Address::pool_account(9), Address::pool_account(9));
        assert_eq!(Address::pool_account(1).as_bytes()[31], 1);
    }

    #[test]
    fn display_is_hex() {
        let s = Address::from_bytes([0xab; 32]).to_string();
        assert_eq!(s.len(), 64);
        assert!(s.starts_with("abab"));
    }
}
