//! Custom error types for termdispatch
//!
//! "No supported terminal" is not an error: the dispatcher reports it as an
//! `Ok(false)` launch result. Everything here is something the caller has to
//! present or fix.

use thiserror::Error;

/// Main error type for dispatcher operations
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The OS refused to create the child process after a terminal was detected
    #[error("Failed to launch {terminal}: {source}")]
    Spawn {
        terminal: String,
        #[source]
        source: std::io::Error,
    },

    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors, including malformed terminal templates
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl DispatchError {
    /// Create a spawn error for the named terminal
    pub fn spawn(terminal: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            terminal: terminal.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error came from process creation rather than setup
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

/// Result type alias using DispatchError
pub type Result<T> = std::result::Result<T, DispatchError>;
