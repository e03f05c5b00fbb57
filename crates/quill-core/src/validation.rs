//! Event validation: id commitment and signature verification.

use crate::error::ValidationError;
use crate::event::Event;

/// Validate an event received from anywhere outside this process.
///
/// This performs:
/// - Id recomputation over the canonical form
/// - Schnorr signature verification against the author key
///
/// The id is checked first so a tampered body is reported as a mismatch
/// rather than as a bad signature.
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    let computed = event.compute_id();
    if &computed != event.id() {
        return Err(ValidationError::IdMismatch {
            claimed: *event.id(),
            computed,
        });
    }

    event.pubkey().verify(event.id(), event.sig())?;

    Ok(())
}
