//! # Quill Filter
//!
//! Relay subscription filters and the in-memory subscription matcher.
//!
//! ## Overview
//!
//! A [`Filter`] is a conjunction of optional constraints over an event's id,
//! author, kind, tags and creation time. Every set-valued constraint is a
//! tri-state [`Values`]: absent sets do not constrain, empty sets admit
//! nothing. A filter holding an empty set is unsatisfiable and is never put
//! on the wire.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quill_core::Kind;
//! use quill_filter::{author_filters, ReqMessage, SinceMap, SubscriptionId};
//!
//! let relays = vec!["wss://relay.example".to_string()];
//! let since = SinceMap::new();
//! let filters = author_filters(&relays, &[Kind::TEXT_NOTE], Some("ab..."), &since, Some(100));
//!
//! // An empty or malformed pubkey produces no queries at all.
//! for query in filters {
//!     let req = ReqMessage::new(SubscriptionId::new("feed"), vec![query.filter]);
//!     if let Some(frame) = req.to_json() {
//!         println!("{frame}");
//!     }
//! }
//! ```
//!
//! ## Matching
//!
//! ```text
//! relay ──EVENT──> verify ──> SubscriptionMatcher ──> [subscription ids]
//!                    │
//!                    └─ invalid: FilterError::InvalidEvent, never delivered
//! ```

pub mod error;
pub mod filter;
pub mod matcher;
pub mod relay;
pub mod values;

pub use error::{FilterError, Result};
pub use filter::Filter;
pub use matcher::SubscriptionMatcher;
pub use relay::{
    author_filters, group_by_relay, mention_filters, CloseMessage, RelayFilter, ReqMessage,
    SinceMap, SubscriptionId,
};
pub use values::Values;
