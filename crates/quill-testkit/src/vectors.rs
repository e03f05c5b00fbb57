//! Golden test vectors for deterministic verification.
//!
//! Each vector is a fixed draft with the event id every NIP-01
//! implementation must compute for it. Signatures depend on the signer's
//! nonce choice and are not pinned; only their validity is checked.

use quill_core::{Event, EventId, Keypair, Kind, Tag, Timestamp, UnsignedEvent};

/// Secret key every vector is authored with.
pub const AUTHOR_SECRET: [u8; 32] = [0x42; 32];

/// x-only public key of [`AUTHOR_SECRET`].
pub const AUTHOR_PUBKEY: &str = "24653eac434488002cc06bbfb7f10fe18991e35f9fe4302dbea6d2353dc0ab1c";

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub created_at: Timestamp,
    pub kind: Kind,
    pub tags: Vec<Vec<&'static str>>,
    pub content: &'static str,
    /// Expected event id (hex).
    pub expected_id: &'static str,
}

impl GoldenVector {
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.iter().map(|parts| Tag::new(parts.iter().copied())).collect()
    }

    pub fn expected_id(&self) -> EventId {
        EventId::from_hex(self.expected_id).expect("golden id is valid hex")
    }
}

/// The author keypair.
pub fn author() -> Keypair {
    Keypair::from_secret_bytes(&AUTHOR_SECRET).expect("golden secret is a valid key")
}

const AA: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const BB: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "plain text note",
            created_at: 1_700_000_000,
            kind: Kind::TEXT_NOTE,
            tags: vec![],
            content: "hello",
            expected_id: "088d4591a16f4f3956eb50be25acacc2bb29e4491e5bb019965a378c659a49b5",
        },
        GoldenVector {
            name: "note with hashtag and subject",
            created_at: 1_700_000_001,
            kind: Kind::TEXT_NOTE,
            tags: vec![vec!["t", "nostr"], vec!["subject", "Greetings"]],
            content: "tagged note",
            expected_id: "3e0146886d59722b2608f031b1f1093e23d8662914bc0cca00ae0c8961ebb8be",
        },
        GoldenVector {
            name: "reaction with e, p and k tags",
            created_at: 1_700_000_002,
            kind: Kind::REACTION,
            tags: vec![vec!["e", AA], vec!["p", BB], vec!["k", "1"]],
            content: "+",
            expected_id: "259f0c4c52636bd10258f2063947404e8a23c1b363033600dc2a259bbda6df2f",
        },
        GoldenVector {
            name: "content needing escapes",
            created_at: 1_700_000_003,
            kind: Kind::TEXT_NOTE,
            tags: vec![],
            content: "line\nbreak \"quoted\" \\ tab\t ünïcode ✓",
            expected_id: "a1df8152ebd7e1e309f2e883416aec0950abf907a79feb00eb6b55ac6e9884bf",
        },
        GoldenVector {
            name: "zap poll with options and threshold",
            created_at: 1_700_000_004,
            kind: Kind::ZAP_POLL,
            tags: vec![
                vec!["poll_option", "0", "yes"],
                vec!["poll_option", "1", "no"],
                vec!["consensus_threshold", "46"],
            ],
            content: "Poll?",
            expected_id: "d396baad4c6b09bc2961566cc0d5bc5c2661c5c1c5efd720cbe431a6d348180e",
        },
    ]
}

/// The unsigned draft a vector describes.
pub fn draft_from_vector(vector: &GoldenVector) -> UnsignedEvent {
    UnsignedEvent::new(author().public_key(), vector.kind, vector.tags(), vector.content)
        .created_at(vector.created_at)
}

/// Sign a vector with the golden author key.
pub fn event_from_vector(vector: &GoldenVector) -> Event {
    draft_from_vector(vector)
        .sign_with(&author())
        .expect("golden author signs its own drafts")
}

/// Compute every vector's id and report whether it matches.
///
/// Call this to verify your implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hex = draft_from_vector(v).id().to_hex();
            (v.name.to_string(), hex == v.expected_id, hex)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_pubkey() {
        assert_eq!(author().public_key().to_hex(), AUTHOR_PUBKEY);
    }

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hex) in verify_all_vectors() {
            assert!(matches, "{name}: computed {hex}");
        }
    }

    #[test]
    fn test_signed_vectors_verify() {
        for vector in all_vectors() {
            let event = event_from_vector(&vector);
            assert_eq!(*event.id(), vector.expected_id(), "{}", vector.name);
            assert!(event.verify().is_ok(), "{}", vector.name);
        }
    }

    #[test]
    fn test_local_signing_is_deterministic() {
        let vector = &all_vectors()[0];
        assert_eq!(event_from_vector(vector), event_from_vector(vector));
    }
}
