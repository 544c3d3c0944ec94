//! Per-level failure accumulators.

use crate::config::TxStateConfig;
use crate::core::ConfidenceLevel;
use crate::retry::RetryTimeoutState;
use serde::{Deserialize, Serialize};

/// One [`RetryTimeoutState`] for each level that can be backtracked from,
/// plus an always-dead one for `Dead`.
///
/// `PreTransmit` and `InFlight` have no accumulator.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RetryTable {
    dead: RetryTimeoutState,
    mempool: RetryTimeoutState,
    soft_confirmed: RetryTimeoutState,
    hard_confirmed: RetryTimeoutState,
}

impl RetryTable {
    pub fn new(config: &TxStateConfig) -> Self {
        Self {
            dead: RetryTimeoutState::always_dead(),
            mempool: RetryTimeoutState::from_policy(config.mempool),
            soft_confirmed: RetryTimeoutState::from_policy(config.reorg),
            hard_confirmed: RetryTimeoutState::from_policy(config.reorg),
        }
    }

    /// First level whose accumulator is not configured the way
    /// [`RetryTable::new`] would build it from `config`.
    ///
    /// Only thresholds and spacing are compared; failure counts are state.
    pub fn mismatch(&self, config: &TxStateConfig) -> Option<ConfidenceLevel> {
        let expected = Self::new(config);
        ConfidenceLevel::ALL.into_iter().find(|&level| {
            let settings = |table: &Self| {
                table
                    .get(level)
                    .map(|retry| (retry.max_tries(), retry.min_spacing()))
            };
            settings(self) != settings(&expected)
        })
    }

    pub fn get(&self, level: ConfidenceLevel) -> Option<&RetryTimeoutState> {
        match level {
            ConfidenceLevel::Dead => Some(&self.dead),
            ConfidenceLevel::PreTransmit | ConfidenceLevel::InFlight => None,
            ConfidenceLevel::Mempool => Some(&self.mempool),
            ConfidenceLevel::SoftConfirmed => Some(&self.soft_confirmed),
            ConfidenceLevel::HardConfirmed => Some(&self.hard_confirmed),
        }
    }

    pub fn get_mut(&mut self, level: ConfidenceLevel) -> Option<&mut RetryTimeoutState> {
        match level {
            ConfidenceLevel::Dead => Some(&mut self.dead),
            ConfidenceLevel::PreTransmit | ConfidenceLevel::InFlight => None,
            ConfidenceLevel::Mempool => Some(&mut self.mempool),
            ConfidenceLevel::SoftConfirmed => Some(&mut self.soft_confirmed),
            ConfidenceLevel::HardConfirmed => Some(&mut self.hard_confirmed),
        }
    }
}
