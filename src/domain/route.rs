//! Swap routing hops.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One hop of a routed swap: trade the running coin in `pool_id` for `denom_to`.
///
/// # Examples
///
/// ```
/// use stableswap_engine::domain::Route;
///
/// let hop = Route::new(0, "uusdc");
/// assert_eq!(hop.pool_id, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Pool to trade against.
    pub pool_id: u64,
    /// Denom received from this hop.
    pub denom_to: String,
}

impl Route {
    /// Creates a hop.
    pub fn new(pool_id: u64, denom_to: impl Into<String>) -> Self {
        Self {
            pool_id,
            denom_to: denom_to.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.pool_id, self.denom_to)
    }
}
