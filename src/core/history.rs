//! Level change history.
//!
//! Provides an audit trail of every confidence level change a machine has
//! gone through, together with the observation that caused it.

use super::level::ConfidenceLevel;
use super::Epoch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poller input that caused a level change.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Observation {
    Transmit,
    DeclineTransmit,
    RejectResponse,
    OffNetwork,
    InMempool,
    ConfirmBlock { n_blocks: u32 },
}

/// Record of a single level change.
///
/// # Example
///
/// ```rust
/// use tx_confidence::core::{ConfidenceLevel, LevelTransition, Observation};
///
/// let transition = LevelTransition {
///     from: ConfidenceLevel::PreTransmit,
///     to: ConfidenceLevel::InFlight,
///     epoch: Some(1_700_000_000),
///     cause: Observation::Transmit,
/// };
/// assert!(transition.timestamp().is_some());
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LevelTransition {
    /// The level being left
    pub from: ConfidenceLevel,
    /// The level being entered
    pub to: ConfidenceLevel,
    /// Observation time, absent for inputs that carry no epoch
    pub epoch: Option<Epoch>,
    /// The input that triggered the change
    pub cause: Observation,
}

impl LevelTransition {
    /// Observation time as a UTC timestamp.
    ///
    /// Returns `None` when the input carried no epoch or the epoch is out of
    /// chrono's representable range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.epoch?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Ordered history of level changes.
///
/// History is immutable - `record` returns a new history with the
/// transition appended.
///
/// # Example
///
/// ```rust
/// use tx_confidence::core::{ConfidenceLevel, LevelHistory, LevelTransition, Observation};
///
/// let history = LevelHistory::new()
///     .record(LevelTransition {
///         from: ConfidenceLevel::PreTransmit,
///         to: ConfidenceLevel::InFlight,
///         epoch: Some(0),
///         cause: Observation::Transmit,
///     })
///     .record(LevelTransition {
///         from: ConfidenceLevel::InFlight,
///         to: ConfidenceLevel::Mempool,
///         epoch: Some(30),
///         cause: Observation::InMempool,
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3);
/// assert_eq!(history.duration(), Some(std::time::Duration::from_secs(30)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelHistory {
    transitions: Vec<LevelTransition>,
}

impl LevelHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The receiver is left unchanged.
    pub fn record(&self, transition: LevelTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place, keeping at most `limit` of the newest
    /// records.
    pub fn push(&mut self, transition: LevelTransition, limit: usize) {
        self.transitions.push(transition);
        if self.transitions.len() > limit {
            let excess = self.transitions.len() - limit;
            self.transitions.drain(..excess);
        }
    }

    /// Levels traversed in order: the first `from`, then every `to`.
    ///
    /// Once older records have been dropped by [`push`](Self::push), the path
    /// starts at the oldest retained record.
    pub fn get_path(&self) -> Vec<ConfidenceLevel> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time spanned between the first and last transitions that carry an
    /// epoch.
    ///
    /// Returns `None` if fewer than one such transition exists, or if the
    /// recorded epochs run backwards.
    pub fn duration(&self) -> Option<Duration> {
        let mut epochs = self.transitions.iter().filter_map(|t| t.epoch);
        let first = epochs.next()?;
        let last = epochs.last().unwrap_or(first);
        last.checked_sub(first).map(Duration::from_secs)
    }

    /// All transitions, oldest first.
    pub fn transitions(&self) -> &[LevelTransition] {
        &self.transitions
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<&LevelTransition> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
