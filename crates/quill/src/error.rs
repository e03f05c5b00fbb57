//! Error types for Quill sessions.

use quill_core::CoreError;
use quill_filter::FilterError;
use quill_signer::SignerError;
use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum QuillError {
    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Filter or delivery error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Signer error.
    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for QuillError {
    fn from(e: serde_json::Error) -> Self {
        QuillError::Config(e.to_string())
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, QuillError>;
