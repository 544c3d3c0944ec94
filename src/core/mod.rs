//! Core value types.
//!
//! This module contains the plain data the state machine is built from:
//! - The ordered confidence ladder
//! - The consumer-facing status and its projection
//! - Immutable history of level changes
//!
//! Everything here is pure; nothing reads a clock or performs I/O.

mod history;
mod level;
mod status;

pub use history::{LevelHistory, LevelTransition, Observation};
pub use level::ConfidenceLevel;
pub use status::TxNetworkStatus;

/// Observation time in Unix seconds.
///
/// Epochs fed to a single machine must be non-decreasing.
pub type Epoch = u64;
