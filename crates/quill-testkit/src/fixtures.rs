//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use quill_core::{Event, Keypair, Kind, PublicKey, Tag, Timestamp, UnsignedEvent};
use quill_signer::{KeypairSigner, Signer, SignerError};

/// Creation time used by fixture events.
pub const FIXTURE_TIME: Timestamp = 1_700_000_000;

/// A test fixture with a deterministic keypair.
pub struct TestFixture {
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from a secret.
    pub fn with_secret(secret: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_secret_bytes(&secret).expect("fixture secret is a valid key"),
        }
    }

    /// Get the keypair's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// A local signer over the fixture key.
    pub fn signer(&self) -> Arc<KeypairSigner> {
        Arc::new(KeypairSigner::new(self.keypair.clone()))
    }

    /// A draft authored by the fixture at [`FIXTURE_TIME`].
    pub fn draft(&self, kind: Kind, tags: Vec<Tag>, content: &str) -> UnsignedEvent {
        UnsignedEvent::new(self.public_key(), kind, tags, content).created_at(FIXTURE_TIME)
    }

    /// Sign any draft with the fixture key.
    pub fn sign(&self, draft: UnsignedEvent) -> Event {
        draft
            .sign_with(&self.keypair)
            .expect("fixture signs its own drafts")
    }

    /// A signed kind-1 note.
    pub fn make_note(&self, content: &str) -> Event {
        self.sign(self.draft(Kind::TEXT_NOTE, vec![], content))
    }

    /// A signed event of any kind.
    pub fn make_event(&self, kind: Kind, tags: Vec<Tag>, content: &str) -> Event {
        self.sign(self.draft(kind, tags, content))
    }

    /// A signed addressable event with the given `d` identifier.
    pub fn make_addressable(&self, kind: Kind, identifier: &str, content: &str) -> Event {
        self.make_event(kind, vec![Tag::from(["d", identifier])], content)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut secret = [0u8; 32];
            secret[31] = 1;
            secret[0] = i as u8;
            TestFixture::with_secret(secret)
        })
        .collect()
}

/// A signer that owns a key but refuses every request.
#[derive(Debug, Clone)]
pub struct RejectingSigner {
    pubkey: PublicKey,
}

impl RejectingSigner {
    pub fn new(pubkey: PublicKey) -> Self {
        Self { pubkey }
    }
}

#[async_trait]
impl Signer for RejectingSigner {
    fn public_key(&self) -> PublicKey {
        self.pubkey
    }

    fn is_writeable(&self) -> bool {
        true
    }

    async fn sign(&self, _draft: UnsignedEvent) -> quill_signer::Result<Event> {
        Err(SignerError::Rejected("rejected by test signer".into()))
    }
}

/// Wraps a signer and counts how often it is asked to sign.
#[derive(Debug)]
pub struct CountingSigner<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S: Signer> CountingSigner<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: Signer> Signer for CountingSigner<S> {
    fn public_key(&self) -> PublicKey {
        self.inner.public_key()
    }

    fn is_writeable(&self) -> bool {
        self.inner.is_writeable()
    }

    async fn sign(&self, draft: UnsignedEvent) -> quill_signer::Result<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign(draft).await
    }
}
