//! # Quill Signer
//!
//! Asynchronous signing capability, verified sign requests and duplicate
//! action cooldowns.
//!
//! ## Overview
//!
//! Nothing outside a [`Signer`] ever touches a secret key. Drafts go in,
//! signed events come out, and every signed event is verified against its
//! draft before anyone acts on it.
//!
//! ## Signers
//!
//! - [`KeypairSigner`]: signs in-process with a local key
//! - [`ReadOnlySigner`]: knows a public key, always fails with
//!   [`SignerError::NotWriteable`]
//! - [`ChannelSigner`]: forwards [`SignRequest`]s to an out-of-process
//!   handler and gives up after a timeout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quill_core::{Kind, UnsignedEvent};
//! use quill_signer::{sign_then, KeypairSigner, Signer};
//!
//! # async fn example() {
//! let signer = Arc::new(KeypairSigner::generate());
//! let draft = UnsignedEvent::new(signer.public_key(), Kind::TEXT_NOTE, vec![], "hello");
//!
//! // Returns immediately; the closure runs once the event is signed and verified.
//! let handle = sign_then(signer, draft, |event| println!("{}", event.to_json()));
//! # let _ = handle.await;
//! # }
//! ```

pub mod channel;
pub mod cooldown;
pub mod error;
pub mod request;
pub mod signer;

pub use channel::{ChannelSigner, SignRequest};
pub use cooldown::{CooldownGuard, DEFAULT_COOLDOWN_SECS};
pub use error::{Result, SignerError};
pub use request::{check_signed, sign_then, sign_verified};
pub use signer::{KeypairSigner, ReadOnlySigner, Signer};
