//! Error types for the showcase service

use std::time::Duration;

/// Errors that can occur in the showcase service
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("GitHub API responded with status: {0}")]
    Status(u16),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for showcase operations
pub type Result<T> = std::result::Result<T, ShowcaseError>;
