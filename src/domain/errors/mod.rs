// Domain errors - Error types for the slicing core

use thiserror::Error;

/// Errors raised while slicing a video
#[derive(Error, Debug)]
pub enum SliceError {
    /// Malformed or out-of-range time text
    #[error("Invalid timecode '{text}': {reason}")]
    InvalidTimecode { text: String, reason: String },

    /// Requested range is empty, reversed or outside the source
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Source unreadable or the probing tool failed
    #[error("Failed to probe media file: {0}")]
    ProbeFailure(String),

    /// An extract/transcode/concat invocation failed or timed out
    #[error("{tool} failed ({status}): {stderr}")]
    ProcessFailure {
        tool: String,
        status: String,
        stderr: String,
    },

    /// The planner produced an empty or negative region
    #[error("Planning inconsistency: {0}")]
    PlanningInconsistency(String),

    /// Typed invocation parameters rejected before any process launch
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scratch or output file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SliceError {
    /// Build an `InvalidTimecode` error
    pub fn timecode(text: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTimecode {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this by changing its input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SliceError::InvalidTimecode { .. } | SliceError::InvalidRange(_)
        )
    }
}

/// Result type alias for slicing operations
pub type SliceResult<T> = std::result::Result<T, SliceError>;
