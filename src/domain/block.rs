//! Block height and time supplied by the host oracle.

use serde::{Deserialize, Serialize};

/// The current block as seen by the engine.
///
/// Every state transition receives the block explicitly; the engine never
/// reads a clock of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block height.
    pub height: u64,
    /// Block time in unix seconds.
    pub time: i64,
}

impl BlockInfo {
    /// Creates a block descriptor.
    #[must_use]
    pub const fn new(height: u64, time: i64) -> Self {
        Self { height, time }
    }

    /// Returns `true` when a task scheduled every `interval` blocks fires
    /// at this height.  An interval of zero never fires.
    #[must_use]
    pub const fn fires_every(&self, interval: u64) -> bool {
        interval != 0 && self.height % interval == 0
    }
}
