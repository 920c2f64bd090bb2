//! Error types for the Argus evaluation core
//!
//! This module provides error handling using thiserror for structured error
//! definitions and anyhow for error propagation at the edges.

use thiserror::Error;

/// Main error type for Argus operations
#[derive(Error, Debug)]
pub enum ArgusError {
    /// LLM API request failed (judge or retry generation)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error (outcome recorder)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Trace emission failed (best-effort telemetry, swallowed by the loop)
    #[error("Trace emission error: {0}")]
    Trace(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Argus operations
pub type Result<T> = std::result::Result<T, ArgusError>;

/// Convert anyhow::Error to ArgusError
impl From<anyhow::Error> for ArgusError {
    fn from(err: anyhow::Error) -> Self {
        ArgusError::Other(err.to_string())
    }
}
