//! Checkpoint error types.

use crate::config::ConfigError;
use crate::core::ConfidenceLevel;
use thiserror::Error;

/// Errors raised while encoding, decoding or restoring a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("JSON checkpoint codec failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary checkpoint codec failed: {0}")]
    Binary(#[from] bincode::Error),

    /// Written by a newer or older layout than this build understands
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Checkpoint carries an invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// An accumulator's threshold or spacing disagrees with the config
    #[error("Retry state for '{level}' does not match the checkpoint config")]
    RetryTableMismatch { level: ConfidenceLevel },
}
