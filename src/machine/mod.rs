//! Transaction network state machine.
//!
//! # Key Concepts
//!
//! - **Touch**: a positive observation promotes straight to its level, or
//!   counts as a failure against a stronger level already held
//! - **Backtrack**: a failure against the current level's accumulator, which
//!   drops one level once the accumulator gives up
//! - **Replacement overlay**: masks the status as `Dead` without discarding
//!   the level underneath
//!
//! Every operation is synchronous and bounded. Mutation takes `&mut self`, so
//! a machine shared between threads must sit behind the owner's lock.

mod error;
mod network;
mod retry_table;

pub use error::TransitionError;
pub use network::TxNetworkStateMachine;
pub use retry_table::RetryTable;
