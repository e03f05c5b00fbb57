//! Signing through a request/response channel.
//!
//! [`ChannelSigner`] forwards each draft to a handler that lives elsewhere
//! (a remote signer bridge, a hardware device prompt, a UI confirmation) and
//! waits for its answer.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use quill_core::{Event, Keypair, PublicKey, Signature, UnsignedEvent};

use crate::error::{Result, SignerError};
use crate::signer::{check_author, Signer};

/// Default number of requests that may wait for the handler.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// A pending sign request handed to the handler side.
///
/// Dropping a request without answering it makes the waiting signer fail
/// with [`SignerError::Unreachable`].
#[derive(Debug)]
pub struct SignRequest {
    draft: UnsignedEvent,
    reply: oneshot::Sender<Result<Event>>,
}

impl SignRequest {
    /// The draft awaiting a signature.
    pub fn draft(&self) -> &UnsignedEvent {
        &self.draft
    }

    /// Answer with a fully signed event.
    pub fn respond(self, event: Event) {
        let _ = self.reply.send(Ok(event));
    }

    /// Answer with a bare signature over the draft.
    pub fn respond_with_signature(self, signature: Signature) {
        let event = self.draft.clone().with_signature(signature);
        self.respond(event);
    }

    /// Sign with `keypair` and answer.
    pub fn approve(self, keypair: &Keypair) {
        let result = self.draft.clone().sign_with(keypair).map_err(SignerError::from);
        let _ = self.reply.send(result);
    }

    /// Decline the request.
    pub fn reject(self, reason: impl Into<String>) {
        let _ = self.reply.send(Err(SignerError::Rejected(reason.into())));
    }
}

/// A signer whose key lives on the other end of a channel.
#[derive(Debug, Clone)]
pub struct ChannelSigner {
    pubkey: PublicKey,
    requests: mpsc::Sender<SignRequest>,
    timeout: Duration,
}

impl ChannelSigner {
    /// Create a signer and the receiving end its handler should drain.
    pub fn new(pubkey: PublicKey, timeout: Duration) -> (Self, mpsc::Receiver<SignRequest>) {
        Self::with_queue_depth(pubkey, timeout, DEFAULT_QUEUE_DEPTH)
    }

    pub fn with_queue_depth(
        pubkey: PublicKey,
        timeout: Duration,
        depth: usize,
    ) -> (Self, mpsc::Receiver<SignRequest>) {
        let (requests, receiver) = mpsc::channel(depth.max(1));
        let signer = Self {
            pubkey,
            requests,
            timeout,
        };
        (signer, receiver)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn exchange(&self, draft: UnsignedEvent) -> Result<Event> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(SignRequest { draft, reply })
            .await
            .map_err(|_| SignerError::Unreachable("handler is gone".into()))?;
        response
            .await
            .map_err(|_| SignerError::Unreachable("handler dropped the request".into()))?
    }
}

#[async_trait]
impl Signer for ChannelSigner {
    fn public_key(&self) -> PublicKey {
        self.pubkey
    }

    fn is_writeable(&self) -> bool {
        !self.requests.is_closed()
    }

    async fn sign(&self, draft: UnsignedEvent) -> Result<Event> {
        check_author(&self.pubkey, &draft)?;

        match tokio::time::timeout(self.timeout, self.exchange(draft)).await {
            Ok(result) => result,
            Err(_) => Err(SignerError::Unreachable(format!(
                "no answer within {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
