//! Per-call execution context threaded through every state transition.

use crate::config::EngineConfig;
use crate::domain::BlockInfo;
use crate::error::AmmError;
use crate::state::{Bank, State};

/// Handles to everything a state transition reads or writes.
///
/// There is no process-wide store: the host builds a `Context` for each
/// call and every controller method receives it explicitly.
#[derive(Debug)]
pub struct Context<'a, B> {
    /// Keyed pool and position records.
    pub state: &'a mut State,
    /// Token-transfer collaborator.
    pub bank: &'a mut B,
    /// Engine-wide parameters.
    pub config: &'a EngineConfig,
    /// Current block height and time.
    pub block: BlockInfo,
}

impl<'a, B: Bank + Clone> Context<'a, B> {
    /// Bundles the collaborators for one call.
    pub fn new(state: &'a mut State, bank: &'a mut B, config: &'a EngineConfig, block: BlockInfo) -> Self {
        Self {
            state,
            bank,
            config,
            block,
        }
    }

    /// Current block time (unix seconds).
    #[must_use]
    pub const fn now(&self) -> i64 {
        self.block.time
    }

    /// Runs `f` with all-or-nothing semantics.
    ///
    /// State and bank are snapshotted first and restored if `f` fails, so
    /// a failed operation leaves every record and balance untouched.
    ///
    /// The snapshot is a full clone of both, linear in their size.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn atomic<T, F>(&mut self, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Self) -> Result<T, AmmError>,
    {
        let state = self.state.clone();
        let bank = self.bank.clone();
        let result = f(self);
        if result.is_err() {
            *self.state = state;
            *self.bank = bank;
        }
        result
    }
}
