//! Custom error types for papertriage.
//!
//! This module defines all error types used throughout the application.
//! All functions return `Result<T, TriageError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for papertriage operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum TriageError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// External API returned a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code from the service
        code: i32,
        /// Error message from the service
        message: String,
    },

    /// Response body did not match the expected schema (missing or empty field)
    #[error("Schema violation: {0}")]
    Schema(String),

    /// Expected document structure not found in scraped HTML
    #[error("Parse error: {0}")]
    Parse(String),

    /// Labeled dataset file violates the expected 3-column layout
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `TriageError`
pub type Result<T> = std::result::Result<T, TriageError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a schema-violation message
    fn ok_or_schema(self, msg: &str) -> Result<T>;

    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_schema(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| TriageError::Schema(msg.to_string()))
    }

    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| TriageError::Parse(msg.to_string()))
    }
}
