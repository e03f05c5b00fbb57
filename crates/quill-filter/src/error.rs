//! Error types for the filter module.

use thiserror::Error;

/// Errors that can occur while decoding filters or delivering events.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A filter object had a field of the wrong shape.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Relay message or filter JSON could not be decoded.
    #[error("decoding error: {0}")]
    DecodingError(String),

    /// Event failed id or signature verification.
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] quill_core::ValidationError),

    /// Event JSON could not be decoded.
    #[error("core error: {0}")]
    Core(#[from] quill_core::CoreError),
}

impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self {
        FilterError::DecodingError(e.to_string())
    }
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
