//! Internal confidence ladder.
//!
//! A transaction holds exactly one confidence level at a time. Levels are
//! totally ordered from weakest to strongest evidence that the network has
//! accepted the transaction, and the ordering is used directly when deciding
//! whether an observation promotes or contradicts the current level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Degree of evidence that a transaction has been accepted by the network.
///
/// Variants are declared low to high so the derived `Ord` matches the ladder:
///
/// ```rust
/// use tx_confidence::core::ConfidenceLevel;
///
/// assert!(ConfidenceLevel::Dead < ConfidenceLevel::PreTransmit);
/// assert!(ConfidenceLevel::Mempool < ConfidenceLevel::SoftConfirmed);
/// assert!(ConfidenceLevel::HardConfirmed > ConfidenceLevel::SoftConfirmed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// Declined, rejected, timed out or dropped.
    Dead,
    /// Built but not yet handed to the network.
    PreTransmit,
    /// Broadcast, not yet seen anywhere.
    InFlight,
    /// Seen in a mempool with zero confirmations.
    Mempool,
    /// Mined, but with fewer than the configured number of confirmations.
    SoftConfirmed,
    /// Mined with at least the configured number of confirmations.
    HardConfirmed,
}

impl ConfidenceLevel {
    /// Every level, lowest first.
    pub const ALL: [ConfidenceLevel; 6] = [
        Self::Dead,
        Self::PreTransmit,
        Self::InFlight,
        Self::Mempool,
        Self::SoftConfirmed,
        Self::HardConfirmed,
    ];

    /// Name for display and structured logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dead => "Dead",
            Self::PreTransmit => "PreTransmit",
            Self::InFlight => "InFlight",
            Self::Mempool => "Mempool",
            Self::SoftConfirmed => "SoftConfirmed",
            Self::HardConfirmed => "HardConfirmed",
        }
    }

    /// The level a failed backtrack lands on.
    ///
    /// Each confirmed level steps down exactly one rung; losing the mempool
    /// sighting lands on `Dead`. The levels below `Mempool` never backtrack,
    /// so they map to `Dead` as well.
    ///
    /// ```rust
    /// use tx_confidence::core::ConfidenceLevel;
    ///
    /// assert_eq!(ConfidenceLevel::HardConfirmed.demoted(), ConfidenceLevel::SoftConfirmed);
    /// assert_eq!(ConfidenceLevel::SoftConfirmed.demoted(), ConfidenceLevel::Mempool);
    /// assert_eq!(ConfidenceLevel::Mempool.demoted(), ConfidenceLevel::Dead);
    /// ```
    pub fn demoted(self) -> ConfidenceLevel {
        match self {
            Self::HardConfirmed => Self::SoftConfirmed,
            Self::SoftConfirmed => Self::Mempool,
            Self::Mempool | Self::InFlight | Self::PreTransmit | Self::Dead => Self::Dead,
        }
    }

    /// Whether the transaction has been seen in a block at all.
    pub fn is_confirmed(&self) -> bool {
        *self >= Self::SoftConfirmed
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_strictly_increasing() {
        for pair in ConfidenceLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort below {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn demotion_steps_down_one_rung() {
        assert_eq!(
            ConfidenceLevel::HardConfirmed.demoted(),
            ConfidenceLevel::SoftConfirmed
        );
        assert_eq!(
            ConfidenceLevel::SoftConfirmed.demoted(),
            ConfidenceLevel::Mempool
        );
        assert_eq!(ConfidenceLevel::Mempool.demoted(), ConfidenceLevel::Dead);
        assert_eq!(ConfidenceLevel::Dead.demoted(), ConfidenceLevel::Dead);
    }

    #[test]
    fn demotion_never_raises_a_level() {
        for level in ConfidenceLevel::ALL {
            assert!(level.demoted() <= level);
        }
    }

    #[test]
    fn is_confirmed_covers_both_confirmed_levels() {
        assert!(!ConfidenceLevel::Mempool.is_confirmed());
        assert!(ConfidenceLevel::SoftConfirmed.is_confirmed());
        assert!(ConfidenceLevel::HardConfirmed.is_confirmed());
    }

    #[test]
    fn name_matches_display() {
        for level in ConfidenceLevel::ALL {
            assert_eq!(level.name(), level.to_string());
        }
    }

    #[test]
    fn level_serializes_correctly() {
        let level = ConfidenceLevel::SoftConfirmed;
        let json = serde_json::to_string(&level).unwrap();
        let deserialized: ConfidenceLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(level, deserialized);
    }
}
