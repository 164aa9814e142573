//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! The calculator and renderer never fail: missing or malformed values are
//! coalesced at the input boundary. Errors only arise when a payload cannot
//! be read at all (no certificate object, broken JSON/YAML) or when a
//! configuration carries rates the calculator cannot use.

use thiserror::Error;

/// Top-level error type for the workspace.
#[derive(Error, Debug)]
pub enum BtpError {
    /// The input payload is structurally unusable.
    #[error("input error: {0}")]
    Input(String),

    /// The configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BtpError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for BtpError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Error in rate or rendering configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A rate is negative, NaN or infinite.
    #[error("rate {name} must be a finite, non-negative number, got {value}")]
    InvalidRate {
        /// Configuration key of the rejected rate.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A fractional rate exceeds 1 (100 %).
    #[error("rate {name} is a fraction and must not exceed 1, got {value}")]
    RateAboveOne {
        /// Configuration key of the rejected rate.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
