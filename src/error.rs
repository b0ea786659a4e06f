//! Error types for playlist-slicer
//!
//! Two families live here:
//! - [`Error`]: crate-wide failures (configuration, transport, I/O). These abort
//!   the current turn but never the service.
//! - [`ValidationError`]: malformed user replies during parameter collection.
//!   They never escape the conversation state machine; each one maps to a
//!   re-prompt.
//!
//! Outcomes of the external extraction tool are deliberately *not* errors; see
//! [`ExtractionOutcome`](crate::types::ExtractionOutcome).

use thiserror::Error;

/// Result type alias for playlist-slicer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for playlist-slicer
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "tool.quick_timeout")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The chat transport refused or failed to deliver a message
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// A user reply that does not fit the value the current stage asks for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The text does not match any known playlist URL shape
    #[error("not a recognised playlist link")]
    NotAPlaylist,

    /// The text is not an integer
    #[error("not a whole number: {0:?}")]
    NotANumber(String),

    /// Start index must be at least 1
    #[error("start index must be at least 1, got {0}")]
    StartOutOfRange(i64),

    /// Start index beyond the largest supported index
    #[error("start index {0} is too large")]
    StartTooLarge(i64),

    /// End index must not be negative
    #[error("end index must not be negative, got {0}")]
    NegativeEnd(i64),

    /// A bounded end lies before the stored start
    #[error("end index {end} is before start index {start}")]
    EndBeforeStart {
        /// Previously accepted start index
        start: u32,
        /// Rejected end index
        end: u32,
    },

    /// Anything but the two direction tokens
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    /// Batch size outside [1, 100]
    #[error("batch size must be between 1 and 100, got {0}")]
    BatchSizeOutOfRange(i64),
}
