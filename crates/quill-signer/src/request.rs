//! Verified signing and the spawn-and-continue wrapper.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use quill_core::{Event, EventId, PublicKey, UnsignedEvent};

use crate::error::{Result, SignerError};
use crate::signer::Signer;

/// Check a signer's answer against the draft it was given.
///
/// The event must carry the draft's id, be authored by `signer`, and
/// verify.
pub fn check_signed(expected: &EventId, signer: &PublicKey, event: &Event) -> Result<()> {
    if event.id() != expected {
        return Err(SignerError::Forged(format!(
            "expected id {expected}, got {}",
            event.id()
        )));
    }
    if event.pubkey() != signer {
        return Err(SignerError::Forged(format!(
            "signed by {} instead of {signer}",
            event.pubkey()
        )));
    }
    event
        .verify()
        .map_err(|e| SignerError::Forged(e.to_string()))
}

/// Sign `draft` and verify the result before handing it back.
pub async fn sign_verified<S>(signer: &S, draft: UnsignedEvent) -> Result<Event>
where
    S: Signer + ?Sized,
{
    if !signer.is_writeable() {
        return Err(SignerError::NotWriteable);
    }
    let expected = draft.id();
    let event = signer.sign(draft).await?;
    check_signed(&expected, &signer.public_key(), &event)?;
    Ok(event)
}

/// Sign in the background, then run `continuation` with the signed event.
///
/// Returns as soon as the task is spawned. The continuation runs exactly
/// once if signing succeeds and never if it fails; failures are logged and
/// not retried. The handle resolves to the signed event's id.
///
/// Must be called from within a tokio runtime.
pub fn sign_then<S, F>(signer: Arc<S>, draft: UnsignedEvent, continuation: F) -> JoinHandle<Result<EventId>>
where
    S: Signer + ?Sized + 'static,
    F: FnOnce(Event) + Send + 'static,
{
    tokio::spawn(async move {
        let kind = draft.kind;
        match sign_verified(signer.as_ref(), draft).await {
            Ok(event) => {
                let id = *event.id();
                debug!(%id, %kind, "signed");
                continuation(event);
                Ok(id)
            }
            Err(e) => {
                warn!(%kind, error = %e, "signing failed");
                Err(e)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::{KeypairSigner, ReadOnlySigner};
    use async_trait::async_trait;
    use quill_core::{Keypair, Kind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn keypair() -> Keypair {
        Keypair::from_secret_bytes(&[0x42; 32]).unwrap()
    }

    fn draft(pubkey: PublicKey) -> UnsignedEvent {
        UnsignedEvent::new(pubkey, Kind::TEXT_NOTE, vec![], "hello").created_at(1_700_000_000)
    }

    /// Signs something other than what it was asked to sign.
    struct SwappingSigner(Keypair);

    #[async_trait]
    impl Signer for SwappingSigner {
        fn public_key(&self) -> PublicKey {
            self.0.public_key()
        }

        fn is_writeable(&self) -> bool {
            true
        }

        async fn sign(&self, mut draft: UnsignedEvent) -> Result<Event> {
            draft.content = "something else".into();
            Ok(draft.sign_with(&self.0)?)
        }
    }

    #[tokio::test]
    async fn test_continuation_runs_once_on_success() {
        let signer = Arc::new(KeypairSigner::new(keypair()));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let handle = sign_then(signer.clone(), draft(signer.public_key()), move |event| {
            assert_eq!(event.content(), "hello");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let id = handle.await.unwrap().unwrap();
        assert_eq!(id, draft(signer.public_key()).id());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_continuation_skipped_on_failure() {
        let signer = Arc::new(ReadOnlySigner::new(keypair().public_key()));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let handle = sign_then(signer, draft(keypair().public_key()), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(matches!(handle.await.unwrap(), Err(SignerError::NotWriteable)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_swapped_content_counts_as_forged() {
        let signer = SwappingSigner(keypair());
        let err = sign_verified(&signer, draft(signer.public_key()))
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::Forged(_)));
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_dyn_signer() {
        let signer: Arc<dyn Signer> = Arc::new(KeypairSigner::new(keypair()));
        let event = sign_verified(signer.as_ref(), draft(signer.public_key()))
            .await
            .unwrap();
        assert!(event.verify().is_ok());
    }
}
