//! Spaced failure accumulation.
//!
//! Used for unexpected observations that must be re-confirmed several times,
//! over a long enough window, before they are believed.

use crate::core::Epoch;
use serde::{Deserialize, Serialize};

/// Threshold and spacing for a [`RetryTimeoutState`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Minimum seconds between two counted failures
    pub timeout: u64,
    /// Counted failures required before declaring death
    pub tries: u32,
}

impl RetryPolicy {
    pub const fn new(timeout: u64, tries: u32) -> Self {
        Self { timeout, tries }
    }
}

/// Optimistic failure counter.
///
/// One sign of life, even after death was declared, resets the counter.
/// Failures only count when they are at least `min_spacing` seconds apart, so
/// a burst of bad samples looks like a single failure.
///
/// # Example
///
/// ```rust
/// use tx_confidence::retry::RetryTimeoutState;
///
/// let mut state = RetryTimeoutState::new(3, 60);
/// state.fail(60);
/// state.fail(90); // too soon, not counted
/// state.fail(120);
/// assert!(!state.is_dead());
/// state.fail(180);
/// assert!(state.is_dead());
///
/// state.alive(200);
/// assert!(!state.is_dead());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RetryTimeoutState {
    max_tries: u32,
    min_spacing: u64,
    fail_count: u32,
    last_fail_time: Option<Epoch>,
}

impl RetryTimeoutState {
    pub fn new(max_tries: u32, min_spacing: u64) -> Self {
        Self {
            max_tries,
            min_spacing,
            fail_count: 0,
            last_fail_time: None,
        }
    }

    pub fn from_policy(policy: RetryPolicy) -> Self {
        Self::new(policy.tries, policy.timeout)
    }

    /// An accumulator that reports dead from the start and can never be
    /// revived through `fail`.
    pub fn always_dead() -> Self {
        Self::new(0, 0)
    }

    pub fn is_dead(&self) -> bool {
        self.fail_count >= self.max_tries
    }

    /// Record a positive signal, clearing every counted failure.
    pub fn alive(&mut self, _epoch: Epoch) {
        self.fail_count = 0;
        self.last_fail_time = None;
    }

    /// Record a negative signal.
    ///
    /// Counted only if it is the first failure since the last reset or lands
    /// at least `min_spacing` after the previously counted failure. Epochs
    /// earlier than that, including out-of-order ones, are ignored. A window
    /// that would end past `Epoch::MAX` is never reached.
    pub fn fail(&mut self, epoch: Epoch) {
        match self.last_fail_time {
            None => {
                self.fail_count = 1;
                self.last_fail_time = Some(epoch);
            }
            Some(last) if spacing_elapsed(last, self.min_spacing, epoch) => {
                self.fail_count = self.fail_count.saturating_add(1);
                self.last_fail_time = Some(epoch);
            }
            Some(last) => {
                tracing::trace!(
                    epoch,
                    last_fail = last,
                    min_spacing = self.min_spacing,
                    "failure inside spacing window not counted"
                );
            }
        }
    }

    pub fn fail_count(&self) -> u32 {
        self.fail_count
    }

    pub fn last_fail_time(&self) -> Option<Epoch> {
        self.last_fail_time
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    pub fn min_spacing(&self) -> u64 {
        self.min_spacing
    }
}

/// Whether `now` is at least `window` seconds after `since`.
///
/// An end of window beyond `Epoch::MAX` is unreachable, so it never elapses.
pub(crate) fn spacing_elapsed(since: Epoch, window: u64, now: Epoch) -> bool {
    since.checked_add(window).is_some_and(|end| now >= end)
}
