//! Error types.
//!
//! Parkour itself never fails: a transition that is not allowed simply does
//! not happen. The only fallible surface is loading configuration.

use thiserror::Error;

/// Errors produced while loading or validating a [`ParkourConfig`](crate::config::ParkourConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid value for `{field}`: {value} (must be finite and non-negative)")]
    Invalid { field: &'static str, value: f32 },
}

/// Shorthand result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
