//! Snapshots of a machine that its owner can persist and restore.
//!
//! Storage is the owner's concern; this module only turns a machine into JSON
//! or compact binary and back, refusing snapshots it cannot trust.
//!
//! # Example
//!
//! ```rust
//! use tx_confidence::checkpoint::Checkpoint;
//! use tx_confidence::machine::TxNetworkStateMachine;
//!
//! let mut machine = TxNetworkStateMachine::default();
//! machine.transmit(0);
//! machine.in_mempool(15);
//!
//! let json = machine.checkpoint().to_json().unwrap();
//! let restored = Checkpoint::from_json(&json).unwrap().restore().unwrap();
//!
//! assert_eq!(restored, machine);
//! ```

use crate::machine::TxNetworkStateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of one transaction's machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When the snapshot was taken (wall clock, not an observation epoch)
    pub taken_at: DateTime<Utc>,

    /// The captured machine, including its retry table and history
    pub machine: TxNetworkStateMachine,
}

impl Checkpoint {
    pub fn new(machine: TxNetworkStateMachine) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            machine,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Hand back the captured machine after checking the snapshot can be
    /// trusted.
    pub fn restore(self) -> Result<TxNetworkStateMachine, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            tracing::warn!(
                id = %self.id,
                found = self.version,
                supported = CHECKPOINT_VERSION,
                "refusing checkpoint with unsupported version"
            );
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        self.machine.config().validate()?;
        if let Some(level) = self.machine.retry_table().mismatch(self.machine.config()) {
            tracing::warn!(id = %self.id, %level, "refusing checkpoint with inconsistent retry state");
            return Err(CheckpointError::RetryTableMismatch { level });
        }

        tracing::debug!(
            id = %self.id,
            level = %self.machine.level(),
            replaced = self.machine.is_replaced(),
            "restored transaction state from checkpoint"
        );
        Ok(self.machine)
    }
}

impl TxNetworkStateMachine {
    /// Snapshot the machine as it is now.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.clone())
    }
}
