//! tx-confidence: how sure are we that a transaction made it onto the network?
//!
//! A poller repeatedly asks the network about a transaction and gets noisy,
//! sometimes contradictory answers: a lookup misses the mempool, a one-block
//! reorg drops a confirmation, a conflicting spend shows up. This crate folds
//! those observations into a stable status a consumer can display or act on.
//!
//! # Core Concepts
//!
//! - **Confidence level**: an ordered ladder from `Dead` to `HardConfirmed`
//! - **Retry accumulator**: spaced failures a level must absorb before it is
//!   given up, so one flaky sample never flips the status
//! - **Replacement overlay**: marks a transaction superseded without losing
//!   the level underneath
//! - **Status**: the coarse `Pending` / `SoftConfirmed` / `Confirmed` / `Dead`
//!   projection consumers read
//!
//! The machine never reads a clock. Every observation carries the Unix epoch
//! at which it was made.
//!
//! # Example
//!
//! ```rust
//! use tx_confidence::{TxNetworkStateMachine, TxNetworkStatus, TxStateConfig};
//!
//! let config = TxStateConfig::builder()
//!     .confirm_blocks(5)
//!     .reorg(60, 2)
//!     .build()
//!     .unwrap();
//! let mut machine = TxNetworkStateMachine::new(config);
//!
//! machine.transmit(0);
//! machine.confirm_block(5, 0).unwrap();
//! assert_eq!(machine.state(), TxNetworkStatus::Confirmed);
//!
//! // A single reorg sample is absorbed...
//! machine.confirm_block(4, 0).unwrap();
//! assert_eq!(machine.state(), TxNetworkStatus::Confirmed);
//!
//! // ...a second one, far enough apart, is believed.
//! machine.confirm_block(4, 60).unwrap();
//! assert_eq!(machine.state(), TxNetworkStatus::SoftConfirmed);
//! ```

pub mod checkpoint;
pub mod config;
pub mod core;
pub mod machine;
pub mod retry;

// Re-export commonly used types
pub use checkpoint::{Checkpoint, CheckpointError};
pub use config::{ConfigError, TxStateConfig};
pub use core::{ConfidenceLevel, Epoch, TxNetworkStatus};
pub use machine::{TransitionError, TxNetworkStateMachine};
pub use retry::{RetryPolicy, RetryTimeoutState};
