//! Fluent construction of [`TxStateConfig`].

use super::{ConfigError, TxStateConfig};
use crate::retry::RetryPolicy;

/// Builder for [`TxStateConfig`], starting from the defaults.
///
/// ```rust
/// use tx_confidence::config::TxStateConfig;
///
/// let config = TxStateConfig::builder()
///     .confirm_blocks(5)
///     .reorg(60, 2)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.confirm_blocks, 5);
/// assert_eq!(config.reorg.timeout, 60);
/// assert_eq!(config.reorg.tries, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TxStateConfigBuilder {
    config: TxStateConfig,
}

impl TxStateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm_blocks(mut self, n: u32) -> Self {
        self.config.confirm_blocks = n;
        self
    }

    pub fn transmit_timeout(mut self, secs: u64) -> Self {
        self.config.transmit_timeout = secs;
        self
    }

    /// Spacing and failure threshold before a mempool sighting is given up.
    pub fn mempool(mut self, timeout: u64, tries: u32) -> Self {
        self.config.mempool = RetryPolicy::new(timeout, tries);
        self
    }

    /// Spacing and failure threshold before a confirmation is given up.
    pub fn reorg(mut self, timeout: u64, tries: u32) -> Self {
        self.config.reorg = RetryPolicy::new(timeout, tries);
        self
    }

    /// Number of level changes a machine keeps in its history.
    pub fn max_history(mut self, n: usize) -> Self {
        self.config.max_history = n;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<TxStateConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
