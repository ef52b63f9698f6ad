//! Token-transfer collaborator.
//!
//! The engine never owns balances; it asks a [`Bank`] to move coins
//! between accounts.  Hosts plug in their ledger; [`MemoryBank`] is the
//! in-memory implementation used by tests and simulations.

use std::collections::BTreeMap;

use crate::domain::{Address, Coin};
use crate::error::AmmError;

/// Atomic multi-coin transfer primitive.
pub trait Bank {
    /// Returns the balance of `denom` held by `address`.
    fn balance(&self, address: &Address, denom: &str) -> u128;

    /// Moves every coin in `coins` from `from` to `to`.
    ///
    /// Either all coins move or none do.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientFunds`] if `from` cannot cover any
    /// of the coins.
    fn transfer(&mut self, from: &Address, to: &Address, coins: &[Coin]) -> Result<(), AmmError>;
}

/// In-memory [`Bank`] keyed by `(address, denom)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBank {
    balances: BTreeMap<(Address, String), u128>,
}

impl MemoryBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `coin` into `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would overflow.
    pub fn credit(&mut self, address: &Address, coin: &Coin) -> Result<(), AmmError> {
        let entry = self
            .balances
            .entry((*address, coin.denom().to_owned()))
            .or_insert(0);
        *entry = entry
            .checked_add(coin.amount())
            .ok_or(AmmError::Overflow("bank balance overflow"))?;
        Ok(())
    }

    /// Returns every non-zero balance held by `address`, ordered by denom.
    #[must_use]
    pub fn balances_of(&self, address: &Address) -> Vec<Coin> {
        self.balances
            .iter()
            .filter(|((owner, _), amount)| owner == address && **amount > 0)
            .map(|((_, denom), amount)| Coin::new(denom.clone(), *amount))
            .collect()
    }
}

impl Bank for MemoryBank {
    fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .get(&(*address, denom.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, coins: &[Coin]) -> Result<(), AmmError> {
        // Validate the whole batch before touching any balance.
        let mut needed: BTreeMap<&str, u128> = BTreeMap::new();
        for coin in coins {
            let slot = needed.entry(coin.denom()).or_insert(0);
            *slot = slot
                .checked_add(coin.amount())
                .ok_or(AmmError::Overflow("transfer amount overflow"))?;
        }
        for (denom, amount) in &needed {
            if self.balance(from, denom) < *amount {
                return Err(AmmError::InsufficientFunds("sender balance too low"));
            }
        }
        if from == to {
            return Ok(());
        }

        for (denom, amount) in needed {
            if amount == 0 {
                continue;
            }
            if let Some(src) = self.balances.get_mut(&(*from, denom.to_owned())) {
                *src -= amount;
            }
            let dst = self.balances.entry((*to, denom.to_owned())).or_insert(0);
            *dst = dst
                .checked_add(amount)
                .ok_or(AmmError::Overflow("recipient balance overflow"))?;
        }
        Ok(())
    }
}
