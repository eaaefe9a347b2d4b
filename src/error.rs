//! Error types for txcycle
//!
//! Centralized error handling using thiserror. Adapter-level chain failures
//! have their own type (`ChainError`) and are folded into an `Outcome` before
//! they can reach the orchestrator; everything here is fatal to a run.

use thiserror::Error;

use crate::chain::ChainError;

/// All error types that can abort a run or prevent one from starting
#[derive(Debug, Error)]
pub enum CycleError {
    /// Malformed or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing credential file or no usable signing key
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Sampling bounds where min exceeds max
    #[error("Invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: String, max: String },

    /// Chain failure outside of an adapter (connect, balance query)
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// A start was requested while a run is active
    #[error("Already running")]
    AlreadyRunning,

    /// A stop was requested while no run is active
    #[error("Not running")]
    NotRunning,

    /// The run was cancelled at a suspension point
    #[error("Run cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for txcycle operations
pub type Result<T> = std::result::Result<T, CycleError>;
