//! Error types for Cueline.

use thiserror::Error;

/// Main error type for Cueline operations.
#[derive(Error, Debug)]
pub enum CuelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Cueline operations.
pub type Result<T> = std::result::Result<T, CuelineError>;
