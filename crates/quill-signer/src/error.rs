//! Error types for the signer module.

use thiserror::Error;

/// Errors a signer can report.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signer can read the public key but cannot sign.
    #[error("signer is read-only")]
    NotWriteable,

    /// The draft names a different author than the signer.
    #[error("draft pubkey {draft} does not match signer {signer}")]
    PubkeyMismatch { draft: String, signer: String },

    /// The signing party declined the request.
    #[error("sign request rejected: {0}")]
    Rejected(String),

    /// The out-of-process signer did not answer in time or went away.
    #[error("signer unreachable: {0}")]
    Unreachable(String),

    /// The returned event did not verify against the draft.
    #[error("signer returned a forged event: {0}")]
    Forged(String),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] quill_core::CoreError),
}

impl SignerError {
    /// Whether the signing party refused, as opposed to being absent.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SignerError::Rejected(_) | SignerError::Forged(_) | SignerError::NotWriteable
        )
    }
}

/// Result type for signer operations.
pub type Result<T> = std::result::Result<T, SignerError>;
