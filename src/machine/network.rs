//! Per-transaction network state machine.

use crate::config::TxStateConfig;
use crate::core::{
    ConfidenceLevel, Epoch, LevelHistory, LevelTransition, Observation, TxNetworkStatus,
};
use crate::machine::error::TransitionError;
use crate::machine::retry_table::RetryTable;
use crate::retry::{spacing_elapsed, RetryTimeoutState};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tracks what the network has shown us about one transaction.
///
/// The poller feeds in observations, each stamped with the epoch at which it
/// was made. Positive observations promote immediately; contradicting ones
/// only demote after the current level's retry accumulator has seen enough
/// spaced failures. Consumers read the result through [`state`](Self::state).
///
/// # Example
///
/// ```rust
/// use tx_confidence::config::TxStateConfig;
/// use tx_confidence::core::TxNetworkStatus;
/// use tx_confidence::machine::TxNetworkStateMachine;
///
/// let config = TxStateConfig::builder().confirm_blocks(5).build().unwrap();
/// let mut machine = TxNetworkStateMachine::new(config);
///
/// machine.transmit(0);
/// machine.in_mempool(30);
/// assert_eq!(machine.state(), TxNetworkStatus::Pending);
///
/// machine.confirm_block(1, 600).unwrap();
/// assert_eq!(machine.state(), TxNetworkStatus::SoftConfirmed);
///
/// machine.confirm_block(5, 3000).unwrap();
/// assert_eq!(machine.state(), TxNetworkStatus::Confirmed);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TxNetworkStateMachine {
    config: TxStateConfig,
    level: ConfidenceLevel,
    replaced: bool,
    transmit_time: Option<Epoch>,
    retries: RetryTable,
    history: LevelHistory,
}

impl Default for TxNetworkStateMachine {
    fn default() -> Self {
        Self::new(TxStateConfig::default())
    }
}

impl TxNetworkStateMachine {
    /// Create a machine for a transaction that has not been broadcast yet.
    pub fn new(config: TxStateConfig) -> Self {
        Self {
            retries: RetryTable::new(&config),
            config,
            level: ConfidenceLevel::PreTransmit,
            replaced: false,
            transmit_time: None,
            history: LevelHistory::new(),
        }
    }

    /// External status (pure).
    pub fn state(&self) -> TxNetworkStatus {
        TxNetworkStatus::project(self.level, self.replaced)
    }

    pub fn level(&self) -> ConfidenceLevel {
        self.level
    }

    pub fn is_replaced(&self) -> bool {
        self.replaced
    }

    pub fn transmit_time(&self) -> Option<Epoch> {
        self.transmit_time
    }

    pub fn config(&self) -> &TxStateConfig {
        &self.config
    }

    pub fn history(&self) -> &LevelHistory {
        &self.history
    }

    pub(crate) fn retry_table(&self) -> &RetryTable {
        &self.retries
    }

    /// Failure accumulator backing `level`, if it has one.
    pub fn retry_state(&self, level: ConfidenceLevel) -> Option<&RetryTimeoutState> {
        self.retries.get(level)
    }

    /// The transaction was handed to the network.
    ///
    /// Applies from any level; a second call restarts the transmit timeout.
    pub fn transmit(&mut self, epoch: Epoch) {
        if self.level != ConfidenceLevel::PreTransmit {
            debug!(level = %self.level, epoch, "transmit outside PreTransmit, treating as re-broadcast");
        }
        self.transmit_time = Some(epoch);
        self.set_level(ConfidenceLevel::InFlight, Some(epoch), Observation::Transmit);
    }

    /// The transaction was never broadcast.
    pub fn decline_transmit(&mut self) {
        self.set_level(ConfidenceLevel::Dead, None, Observation::DeclineTransmit);
    }

    /// The network refused the broadcast.
    pub fn reject_response(&mut self) {
        self.set_level(ConfidenceLevel::Dead, None, Observation::RejectResponse);
    }

    /// The transaction was not found where the current level says it should be.
    pub fn off_network(&mut self, epoch: Epoch) {
        match self.level {
            ConfidenceLevel::PreTransmit | ConfidenceLevel::Dead => {}
            ConfidenceLevel::InFlight => self.check_transmit_timeout(epoch),
            ConfidenceLevel::Mempool
            | ConfidenceLevel::SoftConfirmed
            | ConfidenceLevel::HardConfirmed => self.backtrack(epoch, Observation::OffNetwork),
        }
    }

    /// The transaction was seen in a mempool with zero confirmations.
    ///
    /// Only call this for lookups that report no confirmed blocks.
    pub fn in_mempool(&mut self, epoch: Epoch) {
        self.touch(ConfidenceLevel::Mempool, epoch, Observation::InMempool);
    }

    /// The transaction was seen with `n_blocks` confirmations.
    ///
    /// Fails with [`TransitionError::AlreadyReplaced`] if the transaction has
    /// been marked replaced.
    pub fn confirm_block(&mut self, n_blocks: u32, epoch: Epoch) -> Result<(), TransitionError> {
        if self.replaced {
            warn!(n_blocks, epoch, level = %self.level, "confirmation reported for replaced transaction");
            return Err(TransitionError::AlreadyReplaced);
        }

        let target = if n_blocks < self.config.confirm_blocks {
            ConfidenceLevel::SoftConfirmed
        } else {
            ConfidenceLevel::HardConfirmed
        };
        self.touch(target, epoch, Observation::ConfirmBlock { n_blocks });
        Ok(())
    }

    /// A conflicting transaction displaced this one.
    ///
    /// Fails with [`TransitionError::AlreadyConfirmed`] once the transaction
    /// has been seen in a block.
    pub fn tx_replaced(&mut self) -> Result<(), TransitionError> {
        if self.level.is_confirmed() {
            warn!(level = %self.level, "replacement reported for confirmed transaction");
            return Err(TransitionError::AlreadyConfirmed { level: self.level });
        }
        if !self.replaced {
            debug!(level = %self.level, "transaction replaced");
        }
        self.replaced = true;
        Ok(())
    }

    /// Clear the replacement overlay, restoring the status underneath.
    pub fn undo_replaced(&mut self) {
        if self.replaced {
            debug!(level = %self.level, "replacement undone");
        }
        self.replaced = false;
    }

    fn check_transmit_timeout(&mut self, epoch: Epoch) {
        let Some(sent) = self.transmit_time else {
            return;
        };
        if spacing_elapsed(sent, self.config.transmit_timeout, epoch) {
            self.set_level(ConfidenceLevel::Dead, Some(epoch), Observation::OffNetwork);
        }
    }

    /// Count a failure against the current level, dropping one rung once its
    /// accumulator gives up.
    fn backtrack(&mut self, epoch: Epoch, cause: Observation) {
        let Some(current) = self.retries.get_mut(self.level) else {
            return;
        };
        current.fail(epoch);
        if !current.is_dead() {
            return;
        }

        let lower = self.level.demoted();
        self.set_level(lower, Some(epoch), cause);
        if let Some(next) = self.retries.get_mut(lower) {
            next.alive(epoch);
        }
    }

    /// Promote to `level`, or treat the observation as contradicting a
    /// stronger level already held.
    fn touch(&mut self, level: ConfidenceLevel, epoch: Epoch, cause: Observation) {
        if self.level > level {
            self.backtrack(epoch, cause);
            return;
        }

        self.set_level(level, Some(epoch), cause);
        if let Some(retry) = self.retries.get_mut(level) {
            retry.alive(epoch);
        }
    }

    fn set_level(&mut self, to: ConfidenceLevel, epoch: Option<Epoch>, cause: Observation) {
        if self.level == to {
            return;
        }
        debug!(from = %self.level, %to, ?epoch, ?cause, "confidence level changed");
        self.history.push(
            LevelTransition {
                from: self.level,
                to,
                epoch,
                cause,
            },
            self.config.max_history,
        );
        self.level = to;
    }
}
