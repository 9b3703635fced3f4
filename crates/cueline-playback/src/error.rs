//! Error types for the playback subsystem.

use thiserror::Error;

/// Errors that can occur when starting playback machinery.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Loops and polls run as tokio tasks and need a runtime to spawn on.
    #[error("No tokio runtime available to run playback tasks")]
    NoRuntime,

    #[error("Invalid playback config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for playback operations.
pub type PlaybackResult<T> = std::result::Result<T, PlaybackError>;
