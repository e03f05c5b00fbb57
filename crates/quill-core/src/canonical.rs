//! Canonical NIP-01 serialization for event identity.
//!
//! The id of an event is the SHA-256 of
//!
//! ```text
//! [0,<pubkey hex>,<created_at>,<kind>,<tags>,<content>]
//! ```
//!
//! written as compact JSON: no whitespace, integers in plain decimal, and
//! strings escaped only where JSON requires it (`"`, `\`, and control
//! characters, with `\n \r \t \b \f` in their short forms). Non-ASCII text
//! is written as raw UTF-8. `serde_json`'s compact writer produces exactly
//! this form.
//!
//! Every relay and client recomputes ids from these bytes, so the format
//! must be reproduced byte-for-byte.

use serde::Serialize;

use crate::crypto::{sha256, PublicKey};
use crate::tag::Tag;
use crate::types::{EventId, Kind, Timestamp};

#[derive(Serialize)]
struct Commitment<'a>(u8, &'a PublicKey, Timestamp, Kind, &'a [Tag], &'a str);

/// Encode the id commitment for the given event fields.
pub fn canonical_bytes(
    pubkey: &PublicKey,
    created_at: Timestamp,
    kind: Kind,
    tags: &[Tag],
    content: &str,
) -> Vec<u8> {
    let commitment = Commitment(0, pubkey, created_at, kind, tags, content);
    // Only strings and integers are involved; writing to a Vec cannot fail.
    serde_json::to_vec(&commitment).expect("JSON serialization failed")
}

/// Compute the event id for the given fields.
pub fn compute_id(
    pubkey: &PublicKey,
    created_at: Timestamp,
    kind: Kind,
    tags: &[Tag],
    content: &str,
) -> EventId {
    EventId(sha256(&canonical_bytes(pubkey, created_at, kind, tags, content)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> PublicKey {
        PublicKey::from_bytes([0xab; 32])
    }

    #[test]
    fn test_canonical_layout() {
        let tags = vec![Tag::from(["t", "nostr"])];
        let bytes = canonical_bytes(&author(), 1_700_000_000, Kind(1), &tags, "hi");
        let expected = format!(r#"[0,"{}",1700000000,1,[["t","nostr"]],"hi"]"#, "ab".repeat(32));
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_escaping_rules() {
        let content = "line\nbreak \"q\" \\ tab\t ünï ✓ \u{1} /";
        let bytes = canonical_bytes(&author(), 0, Kind(1), &[], content);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with(r#""line\nbreak \"q\" \\ tab\t ünï ✓ \u0001 /"]"#));
    }

    #[test]
    fn test_id_changes_with_any_field() {
        let base = compute_id(&author(), 1, Kind(1), &[], "x");
        assert_ne!(base, compute_id(&author(), 2, Kind(1), &[], "x"));
        assert_ne!(base, compute_id(&author(), 1, Kind(2), &[], "x"));
        assert_ne!(base, compute_id(&author(), 1, Kind(1), &[], "y"));
        assert_ne!(
            base,
            compute_id(&author(), 1, Kind(1), &[Tag::from(["t", "a"])], "x")
        );
    }

    #[test]
    fn test_tag_order_is_significant() {
        let ab = vec![Tag::from(["t", "a"]), Tag::from(["t", "b"])];
        let ba = vec![Tag::from(["t", "b"]), Tag::from(["t", "a"])];
        assert_ne!(
            compute_id(&author(), 1, Kind(1), &ab, ""),
            compute_id(&author(), 1, Kind(1), &ba, "")
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn tags() -> impl Strategy<Value = Vec<Tag>> {
            prop::collection::vec(prop::collection::vec(any::<String>(), 1..4), 0..4)
                .prop_map(|tags| tags.into_iter().map(Tag::from).collect())
        }

        proptest! {
            #[test]
            fn test_commitment_decodes_to_its_fields(
                created_at in any::<u64>(),
                kind in any::<u16>(),
                tags in tags(),
                content in any::<String>(),
            ) {
                let bytes = canonical_bytes(&author(), created_at, Kind(kind), &tags, &content);
                let decoded: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                let expected = serde_json::json!([0, author().to_hex(), created_at, kind, tags, content]);
                prop_assert_eq!(decoded, expected);
            }

            #[test]
            fn test_commitment_has_no_whitespace_between_tokens(content in "[a-z]{0,8}") {
                let bytes = canonical_bytes(&author(), 1, Kind(1), &[], &content);
                let text = String::from_utf8(bytes).unwrap();
                prop_assert!(!text.contains(", ") && !text.contains(": "));
            }
        }
    }
}
