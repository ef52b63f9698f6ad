//! Exchange-rate quotes.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Dec;

/// Price of one whole unit of `denom`, expressed in `vs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Pool the quote was taken from.
    pub pool_id: u64,
    /// Denom being priced.
    pub denom: String,
    /// Quote denom.
    pub vs: String,
    /// Units of `vs` per unit of `denom`.
    pub price: Dec,
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 {} = {} {} (pool {})", self.denom, self.price, self.vs, self.pool_id)
    }
}
