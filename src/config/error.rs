//! Configuration errors.

use thiserror::Error;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("confirm_blocks must be at least 1 (got {0})")]
    ZeroConfirmBlocks(u32),

    #[error("{policy}.tries must be at least 1")]
    ZeroTries { policy: &'static str },
}

/// Errors that can occur when loading or building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
