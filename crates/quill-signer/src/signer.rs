//! The signer capability.
//!
//! A signer holds (or fronts for) a secret key. Everything else in Quill
//! only ever sees the public key and the signed result.

use async_trait::async_trait;

use quill_core::{Event, Keypair, PublicKey, UnsignedEvent};

use crate::error::{Result, SignerError};

/// An asynchronous signing capability.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Signer: Send + Sync {
    /// The key events are signed with.
    fn public_key(&self) -> PublicKey;

    /// Whether [`sign`](Signer::sign) can succeed at all.
    fn is_writeable(&self) -> bool;

    /// Sign a draft. The draft's pubkey must equal [`public_key`](Signer::public_key).
    async fn sign(&self, draft: UnsignedEvent) -> Result<Event>;
}

pub(crate) fn check_author(signer: &PublicKey, draft: &UnsignedEvent) -> Result<()> {
    if draft.pubkey != *signer {
        return Err(SignerError::PubkeyMismatch {
            draft: draft.pubkey.to_hex(),
            signer: signer.to_hex(),
        });
    }
    Ok(())
}

/// Signs in-process with a local keypair.
#[derive(Debug)]
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn generate() -> Self {
        Self::new(Keypair::generate())
    }
}

#[async_trait]
impl Signer for KeypairSigner {
    fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    fn is_writeable(&self) -> bool {
        true
    }

    async fn sign(&self, draft: UnsignedEvent) -> Result<Event> {
        check_author(&self.keypair.public_key(), &draft)?;
        Ok(draft.sign_with(&self.keypair)?)
    }
}

/// A known public key with no signing ability.
#[derive(Debug, Clone)]
pub struct ReadOnlySigner {
    pubkey: PublicKey,
}

impl ReadOnlySigner {
    pub fn new(pubkey: PublicKey) -> Self {
        Self { pubkey }
    }
}

#[async_trait]
impl Signer for ReadOnlySigner {
    fn public_key(&self) -> PublicKey {
        self.pubkey
    }

    fn is_writeable(&self) -> bool {
        false
    }

    async fn sign(&self, _draft: UnsignedEvent) -> Result<Event> {
        Err(SignerError::NotWriteable)
    }
}

#[async_trait]
impl<S: Signer + ?Sized> Signer for std::sync::Arc<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn is_writeable(&self) -> bool {
        (**self).is_writeable()
    }

    async fn sign(&self, draft: UnsignedEvent) -> Result<Event> {
        (**self).sign(draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Kind;

    fn keypair() -> Keypair {
        Keypair::from_secret_bytes(&[0x42; 32]).unwrap()
    }

    #[tokio::test]
    async fn test_keypair_signer_signs_valid_event() {
        let signer = KeypairSigner::new(keypair());
        let draft = UnsignedEvent::new(signer.public_key(), Kind::TEXT_NOTE, vec![], "hello")
            .created_at(1_700_000_000);
        let expected_id = draft.id();

        let event = signer.sign(draft).await.unwrap();
        assert_eq!(*event.id(), expected_id);
        assert!(event.verify().is_ok());
    }

    #[tokio::test]
    async fn test_keypair_signer_rejects_foreign_draft() {
        let signer = KeypairSigner::new(keypair());
        let other = Keypair::from_secret_bytes(&[0x01; 32]).unwrap();
        let draft = UnsignedEvent::new(other.public_key(), Kind::TEXT_NOTE, vec![], "x");

        assert!(matches!(
            signer.sign(draft).await,
            Err(SignerError::PubkeyMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_only_signer() {
        let signer = ReadOnlySigner::new(keypair().public_key());
        assert!(!signer.is_writeable());
        let draft = UnsignedEvent::new(signer.public_key(), Kind::TEXT_NOTE, vec![], "x");
        let err = signer.sign(draft).await.unwrap_err();
        assert!(matches!(err, SignerError::NotWriteable));
        assert!(err.is_rejection());
    }
}
