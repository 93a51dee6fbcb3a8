//! Error types for feedgraph
//!
//! Request-level failures live here. Failures scoped to a single field are
//! [`crate::resolver::ResolveError`] and never abort a whole request.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for feedgraph operations
pub type Result<T> = std::result::Result<T, FeedGraphError>;

/// Request-level error type
#[derive(Error, Debug)]
pub enum FeedGraphError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record store errors outside of field resolution (e.g., loading a snapshot)
    #[error("Store error: {0}")]
    Store(#[from] feedstore::Error),

    /// The selection set does not fit the schema; nothing was executed
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The request exceeded its time budget and was cancelled
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Parsing errors (query documents)
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
