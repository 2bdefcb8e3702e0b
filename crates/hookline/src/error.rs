//! Error types for Hookline

use thiserror::Error;

/// Main error type for Hookline operations
#[derive(Error, Debug)]
pub enum HooklineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Proxy service / HTTP errors
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl From<serde_json::Error> for HooklineError {
    fn from(e: serde_json::Error) -> Self {
        HooklineError::Serialization(e.to_string())
    }
}

/// Result type alias for Hookline operations
pub type Result<T> = std::result::Result<T, HooklineError>;
