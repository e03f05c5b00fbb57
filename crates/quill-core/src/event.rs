//! Event: the signed, immutable unit of the protocol.
//!
//! An event is created once, either by signing an [`UnsignedEvent`] or by
//! decoding wire JSON, and never changes afterwards. Changes are expressed as
//! new events.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::canonical::compute_id;
use crate::crypto::{Keypair, PublicKey, Signature};
use crate::error::{CoreError, ValidationError};
use crate::memory::impl_memory_size;
use crate::tag::{IdentifierTag, Tag, TagCodec};
use crate::types::{now_secs, EventId, Kind, Timestamp};
use crate::validation::validate_event;

/// A draft awaiting a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub pubkey: PublicKey,
    pub created_at: Timestamp,
    pub kind: Kind,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Start a draft stamped with the current time.
    pub fn new(pubkey: PublicKey, kind: Kind, tags: Vec<Tag>, content: impl Into<String>) -> Self {
        Self {
            pubkey,
            created_at: now_secs(),
            kind,
            tags,
            content: content.into(),
        }
    }

    /// Override the timestamp.
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// The id this draft will have once signed.
    pub fn id(&self) -> EventId {
        compute_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Sign locally. The keypair must belong to the draft's author.
    pub fn sign_with(self, keypair: &Keypair) -> Result<Event, CoreError> {
        let signer = keypair.public_key();
        if signer != self.pubkey {
            return Err(CoreError::PubkeyMismatch {
                draft: self.pubkey.to_hex(),
                signer: signer.to_hex(),
            });
        }
        let id = self.id();
        let sig = keypair.sign(&id);
        Ok(self.into_event(id, sig))
    }

    /// Attach a signature produced elsewhere. The result is not verified;
    /// callers holding an untrusted signature must call [`Event::verify`].
    pub fn with_signature(self, sig: Signature) -> Event {
        let id = self.id();
        self.into_event(id, sig)
    }

    fn into_event(self, id: EventId, sig: Signature) -> Event {
        Event {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        }
    }
}

/// A signed event as it appears on the wire:
/// `{id, pubkey, created_at, kind, tags, content, sig}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    pubkey: PublicKey,
    created_at: Timestamp,
    kind: Kind,
    tags: Vec<Tag>,
    content: String,
    sig: Signature,
}

impl Event {
    /// Decode wire JSON. The result is not yet trusted; see [`Event::verify`].
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode to wire JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("JSON serialization failed")
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn pubkey(&self) -> &PublicKey {
        &self.pubkey
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sig(&self) -> &Signature {
        &self.sig
    }

    /// Recompute the id from the event's fields.
    pub fn compute_id(&self) -> EventId {
        compute_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Check the id commitment and the signature.
    pub fn verify(&self) -> Result<(), ValidationError> {
        validate_event(self)
    }

    /// Tags carrying `name`, in order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.is_named(name))
    }

    pub fn first_tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.is_named(name))
    }

    /// The first tag of dialect `T` that parses.
    pub fn parse_first<T: TagCodec>(&self) -> Option<T> {
        self.tags_named(T::NAME).find_map(T::parse)
    }

    /// Every tag of dialect `T` that parses, in order.
    pub fn parse_all<T: TagCodec>(&self) -> Vec<T> {
        self.tags_named(T::NAME).filter_map(T::parse).collect()
    }

    /// The `d` tag value, if any.
    pub fn identifier(&self) -> Option<String> {
        self.parse_first::<IdentifierTag>().map(|d| d.identifier)
    }

    /// Coordinates of an addressable event. A missing `d` tag is the empty
    /// identifier.
    pub fn address(&self) -> Option<Address> {
        if !self.kind.is_addressable() {
            return None;
        }
        Some(Address::new(
            self.kind,
            self.pubkey,
            self.identifier().unwrap_or_default(),
        ))
    }

    /// Back to the unsigned fields, dropping id and signature.
    pub fn to_unsigned(&self) -> UnsignedEvent {
        UnsignedEvent {
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags.clone(),
            content: self.content.clone(),
        }
    }
}

impl_memory_size!(UnsignedEvent { pubkey, created_at, kind, tags, content });
impl_memory_size!(Event { id, pubkey, created_at, kind, tags, content, sig });
