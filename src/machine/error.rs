//! Rejected transitions.

use crate::core::ConfidenceLevel;
use thiserror::Error;

/// Inputs the machine refuses because they contradict what it already knows.
///
/// These point at an ordering problem in the poller, not at a ledger
/// condition; the machine's state is left untouched when one is returned.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot confirm a transaction that has been replaced")]
    AlreadyReplaced,

    #[error("Cannot replace a transaction already at '{level}'")]
    AlreadyConfirmed { level: ConfidenceLevel },
}
