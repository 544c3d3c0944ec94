//! Machine configuration.
//!
//! Configuration is fixed when a machine is constructed. Every field has a
//! default, so a partial TOML document (or none at all) is a valid config.
//!
//! # Example
//!
//! ```rust
//! use tx_confidence::config::TxStateConfig;
//!
//! let config = TxStateConfig::from_toml_str(
//!     r#"
//!     confirm_blocks = 6
//!
//!     [reorg]
//!     timeout = 600
//!     tries = 3
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.confirm_blocks, 6);
//! assert_eq!(config.reorg.tries, 3);
//! assert_eq!(config.transmit_timeout, 60);
//! ```

pub mod builder;
pub mod error;

pub use builder::TxStateConfigBuilder;
pub use error::{ConfigError, ConfigViolation};

use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub const DEFAULT_CONFIRM_BLOCKS: u32 = 3;
pub const DEFAULT_TRANSMIT_TIMEOUT: u64 = 60;
pub const DEFAULT_MEMPOOL_POLICY: RetryPolicy = RetryPolicy::new(120, 4);
pub const DEFAULT_REORG_POLICY: RetryPolicy = RetryPolicy::new(300, 5);
pub const DEFAULT_MAX_HISTORY: usize = 256;

/// Parameters of a [`TxNetworkStateMachine`](crate::machine::TxNetworkStateMachine).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TxStateConfig {
    /// Confirmations at which a mined transaction counts as hard confirmed
    pub confirm_blocks: u32,

    /// Seconds a broadcast may go unseen before it is declared dead
    pub transmit_timeout: u64,

    /// Hysteresis for losing a mempool sighting
    pub mempool: RetryPolicy,

    /// Hysteresis for losing confirmations, shared by both confirmed levels
    pub reorg: RetryPolicy,

    /// Level changes kept in the history; older ones are dropped
    pub max_history: usize,
}

impl Default for TxStateConfig {
    fn default() -> Self {
        Self {
            confirm_blocks: DEFAULT_CONFIRM_BLOCKS,
            transmit_timeout: DEFAULT_TRANSMIT_TIMEOUT,
            mempool: DEFAULT_MEMPOOL_POLICY,
            reorg: DEFAULT_REORG_POLICY,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl TxStateConfig {
    pub fn builder() -> TxStateConfigBuilder {
        TxStateConfigBuilder::new()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TxStateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check every semantic rule, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.check() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => {
                let violations: Vec<ConfigViolation> = violations.iter().cloned().collect();
                tracing::warn!(?violations, "rejected transaction state config");
                Err(ConfigError::Invalid(violations))
            }
        }
    }

    fn check(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = vec![
            if self.confirm_blocks >= 1 {
                Validation::success(())
            } else {
                Validation::fail(ConfigViolation::ZeroConfirmBlocks(self.confirm_blocks))
            },
            check_policy("mempool", &self.mempool),
            check_policy("reorg", &self.reorg),
        ];

        Validation::all_vec(checks).map(|_| ())
    }
}

fn check_policy(
    name: &'static str,
    policy: &RetryPolicy,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if policy.tries >= 1 {
        Validation::success(())
    } else {
        Validation::fail(ConfigViolation::ZeroTries { policy: name })
    }
}
