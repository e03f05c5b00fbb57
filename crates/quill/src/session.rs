//! The Session: one author's signer, action cooldowns and subscriptions.
//!
//! A session ties together the pieces an application acts through:
//! outbound actions are built as drafts, guarded against duplicates,
//! signed and verified; inbound events are verified and routed to open
//! subscriptions.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use quill_core::drafts::reaction_draft;
use quill_core::{
    now_secs, repost_draft, Event, EventId, Kind, PublicKey, RepostHints, Timestamp,
    UnsignedEvent,
};
use quill_filter::{
    author_filters, mention_filters, Filter, RelayFilter, SinceMap, SubscriptionId,
    SubscriptionMatcher,
};
use quill_signer::{sign_then, sign_verified, ChannelSigner, CooldownGuard, SignRequest, Signer};

use crate::config::QuillConfig;
use crate::error::Result;

/// An inbound event and the subscriptions it was routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event: Event,
    pub subscriptions: Vec<SubscriptionId>,
}

impl Delivery {
    /// Whether any open subscription wanted the event.
    pub fn is_wanted(&self) -> bool {
        !self.subscriptions.is_empty()
    }
}

/// The main Session struct.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Session {
    /// The signer all outbound events go through.
    signer: Arc<dyn Signer>,
    /// Suppresses repeated boosts of the same event.
    cooldown: Arc<CooldownGuard>,
    /// Open subscriptions.
    matcher: Arc<SubscriptionMatcher>,
    /// Configuration.
    config: QuillConfig,
}

impl Session {
    /// Create a session with a fresh cooldown guard and no subscriptions.
    pub fn new(signer: Arc<dyn Signer>, config: QuillConfig) -> Self {
        let cooldown = Arc::new(CooldownGuard::new(config.boost_cooldown_secs));
        Self {
            signer,
            cooldown,
            matcher: Arc::new(SubscriptionMatcher::new()),
            config,
        }
    }

    /// Create a session whose key lives behind a channel.
    ///
    /// Requests wait at most `config.signer_timeout()` for the handler
    /// draining the returned receiver.
    pub fn with_channel_signer(
        pubkey: PublicKey,
        config: QuillConfig,
    ) -> (Self, mpsc::Receiver<SignRequest>) {
        let (signer, requests) = ChannelSigner::new(pubkey, config.signer_timeout());
        (Self::new(Arc::new(signer), config), requests)
    }

    /// Share a cooldown guard with other sessions (or a test).
    pub fn with_cooldown(mut self, cooldown: Arc<CooldownGuard>) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Share a subscription matcher with other sessions.
    pub fn with_matcher(mut self, matcher: Arc<SubscriptionMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn is_writeable(&self) -> bool {
        self.signer.is_writeable()
    }

    pub fn config(&self) -> &QuillConfig {
        &self.config
    }

    pub fn cooldown(&self) -> &CooldownGuard {
        &self.cooldown
    }

    pub fn matcher(&self) -> &SubscriptionMatcher {
        &self.matcher
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign and verify an arbitrary draft.
    pub async fn publish(&self, draft: UnsignedEvent) -> Result<Event> {
        Ok(sign_verified(self.signer.as_ref(), draft).await?)
    }

    /// Sign in the background and hand the event to `continuation`.
    ///
    /// See [`sign_then`] for the delivery guarantees.
    pub fn publish_then<F>(
        &self,
        draft: UnsignedEvent,
        continuation: F,
    ) -> JoinHandle<quill_signer::Result<EventId>>
    where
        F: FnOnce(Event) + Send + 'static,
    {
        sign_then(Arc::clone(&self.signer), draft, continuation)
    }

    /// Repost `target`, unless this author already did within the cooldown.
    ///
    /// Returns `Ok(None)` for a suppressed duplicate.
    pub async fn boost(&self, target: &Event, hints: &RepostHints) -> Result<Option<Event>> {
        self.boost_at(target, hints, now_secs()).await
    }

    /// [`boost`](Self::boost) with an explicit clock reading.
    pub async fn boost_at(
        &self,
        target: &Event,
        hints: &RepostHints,
        now: Timestamp,
    ) -> Result<Option<Event>> {
        let Some(draft) = self.acquire_boost(target, hints, now) else {
            return Ok(None);
        };

        match sign_verified(self.signer.as_ref(), draft).await {
            Ok(event) => Ok(Some(event)),
            Err(e) => {
                self.cooldown.release(&self.public_key(), target.id());
                warn!(event = %target.id(), error = %e, "boost not signed");
                Err(e.into())
            }
        }
    }

    /// Background [`boost`](Self::boost). Returns `None` for a suppressed
    /// duplicate; otherwise the continuation runs once the repost is signed.
    pub fn boost_then<F>(
        &self,
        target: &Event,
        hints: &RepostHints,
        continuation: F,
    ) -> Option<JoinHandle<quill_signer::Result<EventId>>>
    where
        F: FnOnce(Event) + Send + 'static,
    {
        let draft = self.acquire_boost(target, hints, now_secs())?;
        let signer = Arc::clone(&self.signer);
        let cooldown = Arc::clone(&self.cooldown);
        let actor = self.public_key();
        let target = *target.id();

        Some(tokio::spawn(async move {
            match sign_verified(signer.as_ref(), draft).await {
                Ok(event) => {
                    let id = *event.id();
                    continuation(event);
                    Ok(id)
                }
                Err(e) => {
                    cooldown.release(&actor, &target);
                    warn!(event = %target, error = %e, "boost not signed");
                    Err(e)
                }
            }
        }))
    }

    fn acquire_boost(
        &self,
        target: &Event,
        hints: &RepostHints,
        now: Timestamp,
    ) -> Option<UnsignedEvent> {
        let actor = self.public_key();
        if !self.cooldown.try_acquire(&actor, target.id(), now) {
            debug!(event = %target.id(), "boost suppressed by cooldown");
            return None;
        }
        Some(repost_draft(actor, target, hints))
    }

    /// React to `target` with `reaction`.
    pub async fn react(
        &self,
        target: &Event,
        reaction: &str,
        hints: &RepostHints,
    ) -> Result<Event> {
        let draft = reaction_draft(self.public_key(), target, reaction, hints);
        self.publish(draft).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Open (or replace) a subscription.
    pub fn subscribe(&self, id: SubscriptionId, filters: Vec<Filter>) {
        self.matcher.open(id, filters);
    }

    /// Close a subscription. Returns whether it was open.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.matcher.close(id)
    }

    /// Decode an event from relay JSON, verify it and route it.
    pub fn accept_wire(&self, json: &str) -> Result<Delivery> {
        let event = Event::from_json(json)?;
        self.accept(event)
    }

    /// Verify an already decoded event and route it.
    pub fn accept(&self, event: Event) -> Result<Delivery> {
        let subscriptions = self.matcher.deliver(&event)?;
        Ok(Delivery {
            event,
            subscriptions,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// This author's own events of `kinds`, one filter per relay.
    pub fn author_queries(
        &self,
        relays: &[String],
        kinds: &[Kind],
        since: &SinceMap,
    ) -> Vec<RelayFilter> {
        let pubkey = self.public_key().to_hex();
        author_filters(relays, kinds, Some(&pubkey), since, self.config.default_limit)
    }

    /// Events of `kinds` mentioning this author, one filter per relay.
    pub fn mention_queries(
        &self,
        relays: &[String],
        kinds: &[Kind],
        since: &SinceMap,
    ) -> Vec<RelayFilter> {
        let pubkey = self.public_key().to_hex();
        mention_filters(relays, kinds, Some(&pubkey), since, self.config.default_limit)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pubkey", &self.public_key())
            .field("writeable", &self.is_writeable())
            .field("subscriptions", &self.matcher.len())
            .field("config", &self.config)
            .finish()
    }
}
