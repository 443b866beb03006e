//! Error types for the itemize-core library.
//!
//! Parsing itself never fails; these errors only surface while building a
//! parser from configuration or loading configuration from disk.

use thiserror::Error;

/// Main error type for the itemize library.
#[derive(Error, Debug)]
pub enum ItemizeError {
    /// Noise rule compilation error.
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to building the noise rule set.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A user-supplied noise pattern is not a valid regular expression.
    #[error("invalid noise pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for the itemize library.
pub type Result<T> = std::result::Result<T, ItemizeError>;
