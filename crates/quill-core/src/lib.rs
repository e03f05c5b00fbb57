//! # Quill Core
//!
//! Pure primitives for Quill: events, tags, canonical identity and memory
//! accounting for the Nostr wire protocol.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over signed, content-addressed records.
//!
//! ## Key Types
//!
//! - [`Event`] - An immutable signed record
//! - [`UnsignedEvent`] - A draft awaiting a signature
//! - [`EventId`] - Content-addressed identifier (SHA-256 of the canonical form)
//! - [`Tag`] - A raw positional tag, and [`TypedTag`] for its decoded forms
//! - [`TagArrayBuilder`] - Ordered tag assembly with uniqueness rules
//!
//! ## Canonicalization
//!
//! Event ids commit to compact NIP-01 JSON. See the [`canonical`] module.

pub mod address;
pub mod canonical;
pub mod crypto;
pub mod drafts;
pub mod error;
pub mod event;
pub mod kind;
pub mod memory;
pub mod tag;
pub mod types;
pub mod validation;

pub use address::Address;
pub use canonical::{canonical_bytes, compute_id};
pub use crypto::{sha256, Keypair, PublicKey, Signature};
pub use drafts::{repost_draft, RepostHints, RepostShape};
pub use error::{CoreError, ValidationError};
pub use event::{Event, UnsignedEvent};
pub use kind::KindClass;
pub use memory::MemorySize;
pub use tag::{Tag, TagArrayBuilder, TagCodec, TagRegistry, TypedTag};
pub use types::{now_secs, EventId, Kind, Timestamp};
pub use validation::validate_event;
