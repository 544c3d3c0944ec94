//! Consumer-facing transaction status.

use super::level::ConfidenceLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse status of a transaction as reported to consumers.
///
/// Never stored. It is always recomputed from the confidence level and the
/// replacement overlay by [`TxNetworkStatus::project`], so it cannot drift
/// from the internal state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TxNetworkStatus {
    Pending,
    SoftConfirmed,
    Confirmed,
    Dead,
}

impl TxNetworkStatus {
    /// Project an internal level onto the external status.
    ///
    /// A replaced transaction reads as `Dead` whatever its level.
    ///
    /// ```rust
    /// use tx_confidence::core::{ConfidenceLevel, TxNetworkStatus};
    ///
    /// assert_eq!(
    ///     TxNetworkStatus::project(ConfidenceLevel::Mempool, false),
    ///     TxNetworkStatus::Pending
    /// );
    /// assert_eq!(
    ///     TxNetworkStatus::project(ConfidenceLevel::Mempool, true),
    ///     TxNetworkStatus::Dead
    /// );
    /// ```
    pub fn project(level: ConfidenceLevel, replaced: bool) -> Self {
        if replaced {
            return Self::Dead;
        }
        match level {
            ConfidenceLevel::Dead => Self::Dead,
            ConfidenceLevel::PreTransmit | ConfidenceLevel::InFlight | ConfidenceLevel::Mempool => {
                Self::Pending
            }
            ConfidenceLevel::SoftConfirmed => Self::SoftConfirmed,
            ConfidenceLevel::HardConfirmed => Self::Confirmed,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::SoftConfirmed => "SoftConfirmed",
            Self::Confirmed => "Confirmed",
            Self::Dead => "Dead",
        }
    }
}

impl fmt::Display for TxNetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
