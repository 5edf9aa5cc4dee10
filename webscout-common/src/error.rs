//! Error types for WebScout Common
//!
//! This module provides structured error handling for operations shared
//! across the WebScout crates. Domain-specific errors live in their
//! respective crates and convert into these common types as needed.

use thiserror::Error as ThisError;

/// Result type alias for WebScout operations
pub type Result<T> = std::result::Result<T, WebScoutError>;

/// Common error types for WebScout operations
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum WebScoutError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// The error message providing context
        message: String,
        #[source]
        /// The underlying error that caused this error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Other error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

impl WebScoutError {
    /// Create a generic error with a custom message
    pub fn other(message: impl Into<String>) -> Self {
        WebScoutError::Other {
            message: message.into(),
        }
    }

    /// Wrap an underlying error with additional context
    pub fn context(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        WebScoutError::Context {
            message: message.into(),
            source: Box::new(source),
        }
    }
}
