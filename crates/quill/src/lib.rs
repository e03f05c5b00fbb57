//! # Quill
//!
//! The unified API for Quill: typed Nostr tags, signed events, relay
//! filters and signing sessions.
//!
//! ## Overview
//!
//! Quill provides a pure, transport-free library for:
//!
//! - **Events**: NIP-01 records whose id commits to their canonical JSON
//! - **Tags**: positional string arrays decoded into typed dialects
//! - **Filters**: relay queries and in-memory subscription matching
//! - **Signing**: an asynchronous signer capability with verified results
//!
//! ## Key Concepts
//!
//! - **Round-trip**: every typed tag assembles back to the raw tag it was
//!   parsed from, minus trailing empty fields.
//! - **Unsatisfiable filter**: a filter holding an empty allow-set; it never
//!   matches and is never sent to a relay.
//! - **Cooldown**: a repeated boost of the same event within the window is
//!   silently dropped.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quill::{KeypairSigner, QuillConfig, RepostHints, Session};
//!
//! async fn example(target: quill::Event) -> quill::Result<()> {
//!     let signer = Arc::new(KeypairSigner::generate());
//!     let session = Session::new(signer, QuillConfig::default());
//!
//!     // The second boost within five minutes is a no-op.
//!     let first = session.boost(&target, &RepostHints::default()).await?;
//!     let second = session.boost(&target, &RepostHints::default()).await?;
//!     assert!(first.is_some() && second.is_none());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `quill::core` - Events, tags, drafts and memory accounting
//! - `quill::filter` - Relay filters and the subscription matcher
//! - `quill::signer` - Signers, sign requests and cooldowns

pub mod config;
pub mod error;
pub mod session;

// Re-export component crates
pub use quill_core as core;
pub use quill_filter as filter;
pub use quill_signer as signer;

// Re-export main types for convenience
pub use config::QuillConfig;
pub use error::{QuillError, Result};
pub use session::{Delivery, Session};

// Re-export commonly used types
pub use quill_core::{
    Event, EventId, Keypair, Kind, MemorySize, PublicKey, RepostHints, Tag, TagArrayBuilder,
    TagCodec, TypedTag, UnsignedEvent,
};
pub use quill_filter::{Filter, SubscriptionId};
pub use quill_signer::{ChannelSigner, KeypairSigner, ReadOnlySigner, SignRequest, Signer};
