//! # Quill Testkit
//!
//! Testing utilities for Quill.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed events with the ids every NIP-01 implementation must compute
//! - **Generators**: Proptest strategies for every built-in tag dialect
//! - **Fixtures**: Deterministic keys, event helpers and scripted signers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use quill_testkit::vectors::{all_vectors, draft_from_vector};
//!
//! for vector in all_vectors() {
//!     let id = draft_from_vector(&vector).id();
//!     assert_eq!(id.to_hex(), vector.expected_id);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use quill_core::TypedTag;
//! use quill_testkit::generators::arb_typed_tag;
//!
//! proptest! {
//!     #[test]
//!     fn tags_round_trip(typed in arb_typed_tag()) {
//!         prop_assert_eq!(TypedTag::parse(&typed.assemble()), Some(typed));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, CountingSigner, RejectingSigner, TestFixture};
pub use vectors::{all_vectors, GoldenVector};
