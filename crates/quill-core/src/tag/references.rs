//! Reference dialects: tags pointing at other events, people, addresses,
//! kinds, topics and relays.

use std::fmt;

use crate::address::Address;
use crate::crypto::PublicKey;
use crate::memory::{impl_memory_size, MemorySize, REFERENCE_SLOT};
use crate::tag::{canonical_number, required, Tag, TagCodec};
use crate::types::{EventId, Kind};

/// Parse an optional hex pubkey field. A present but invalid value fails the
/// whole tag, an absent one does not.
fn optional_pubkey(tag: &Tag, index: usize) -> Option<Option<PublicKey>> {
    match tag.optional(index) {
        Some(hex) => PublicKey::from_hex(hex).ok().map(Some),
        None => Some(None),
    }
}

/// Role of an `e` reference within a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    Root,
    Reply,
    Mention,
    /// Any marker this crate does not interpret, kept verbatim.
    Other(String),
}

impl Marker {
    pub fn as_str(&self) -> &str {
        match self {
            Marker::Root => "root",
            Marker::Reply => "reply",
            Marker::Mention => "mention",
            Marker::Other(s) => s,
        }
    }
}

impl From<&str> for Marker {
    fn from(s: &str) -> Self {
        match s {
            "root" => Marker::Root,
            "reply" => Marker::Reply,
            "mention" => Marker::Mention,
            other => Marker::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MemorySize for Marker {
    fn count_memory(&self) -> usize {
        match self {
            Marker::Other(s) => REFERENCE_SLOT + s.count_memory(),
            _ => REFERENCE_SLOT,
        }
    }
}

/// `["e", <event id>, <relay hint>?, <marker>?, <author>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventTag {
    pub id: EventId,
    pub relay: Option<String>,
    pub marker: Option<Marker>,
    pub author: Option<PublicKey>,
}

impl EventTag {
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            relay: None,
            marker: None,
            author: None,
        }
    }

    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.relay = Some(relay.into());
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_author(mut self, author: PublicKey) -> Self {
        self.author = Some(author);
        self
    }
}

impl TagCodec for EventTag {
    const NAME: &'static str = "e";

    fn parse(tag: &Tag) -> Option<Self> {
        let id = EventId::from_hex(required(tag, Self::NAME, 5, 1)?).ok()?;
        Some(Self {
            id,
            relay: tag.optional(2).map(str::to_string),
            marker: tag.optional(3).map(Marker::from),
            author: optional_pubkey(tag, 4)?,
        })
    }

    fn assemble(&self) -> Tag {
        let author = self.author.map(|pk| pk.to_hex());
        Tag::with_optional(
            Self::NAME,
            &[&self.id.to_hex()],
            &[
                self.relay.as_deref(),
                self.marker.as_ref().map(Marker::as_str),
                author.as_deref(),
            ],
        )
    }
}

impl_memory_size!(EventTag { id, relay, marker, author });

/// `["p", <pubkey>, <relay hint>?, <petname>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PubkeyTag {
    pub pubkey: PublicKey,
    pub relay: Option<String>,
    pub petname: Option<String>,
}

impl PubkeyTag {
    pub fn new(pubkey: PublicKey) -> Self {
        Self {
            pubkey,
            relay: None,
            petname: None,
        }
    }

    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.relay = Some(relay.into());
        self
    }
}

impl TagCodec for PubkeyTag {
    const NAME: &'static str = "p";

    fn parse(tag: &Tag) -> Option<Self> {
        let pubkey = PublicKey::from_hex(required(tag, Self::NAME, 4, 1)?).ok()?;
        Some(Self {
            pubkey,
            relay: tag.optional(2).map(str::to_string),
            petname: tag.optional(3).map(str::to_string),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::with_optional(
            Self::NAME,
            &[&self.pubkey.to_hex()],
            &[self.relay.as_deref(), self.petname.as_deref()],
        )
    }
}

impl_memory_size!(PubkeyTag { pubkey, relay, petname });

/// `["a", <kind:pubkey:d>, <relay hint>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressTag {
    pub address: Address,
    pub relay: Option<String>,
}

impl AddressTag {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            relay: None,
        }
    }

    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.relay = Some(relay.into());
        self
    }
}

impl TagCodec for AddressTag {
    const NAME: &'static str = "a";

    fn parse(tag: &Tag) -> Option<Self> {
        let address = Address::parse(required(tag, Self::NAME, 3, 1)?).ok()?;
        Some(Self {
            address,
            relay: tag.optional(2).map(str::to_string),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::with_optional(
            Self::NAME,
            &[&self.address.to_string()],
            &[self.relay.as_deref()],
        )
    }
}

impl_memory_size!(AddressTag { address, relay });

/// What a `q` tag quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuoteTarget {
    Event(EventId),
    Address(Address),
}

impl QuoteTarget {
    fn parse(s: &str) -> Option<Self> {
        if s.contains(':') {
            Address::parse(s).ok().map(QuoteTarget::Address)
        } else {
            EventId::from_hex(s).ok().map(QuoteTarget::Event)
        }
    }
}

impl fmt::Display for QuoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteTarget::Event(id) => write!(f, "{id}"),
            QuoteTarget::Address(address) => write!(f, "{address}"),
        }
    }
}

impl MemorySize for QuoteTarget {
    fn count_memory(&self) -> usize {
        match self {
            QuoteTarget::Event(id) => REFERENCE_SLOT + id.count_memory(),
            QuoteTarget::Address(address) => REFERENCE_SLOT + address.count_memory(),
        }
    }
}

/// `["q", <event id | address>, <relay hint>?, <author>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteTag {
    pub target: QuoteTarget,
    pub relay: Option<String>,
    pub author: Option<PublicKey>,
}

impl TagCodec for QuoteTag {
    const NAME: &'static str = "q";

    fn parse(tag: &Tag) -> Option<Self> {
        let target = QuoteTarget::parse(required(tag, Self::NAME, 4, 1)?)?;
        Some(Self {
            target,
            relay: tag.optional(2).map(str::to_string),
            author: optional_pubkey(tag, 3)?,
        })
    }

    fn assemble(&self) -> Tag {
        let author = self.author.map(|pk| pk.to_hex());
        Tag::with_optional(
            Self::NAME,
            &[&self.target.to_string()],
            &[self.relay.as_deref(), author.as_deref()],
        )
    }
}

impl_memory_size!(QuoteTag { target, relay, author });

/// `["k", <kind>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindTag {
    pub kind: Kind,
}

impl KindTag {
    pub const fn new(kind: Kind) -> Self {
        Self { kind }
    }
}

impl TagCodec for KindTag {
    const NAME: &'static str = "k";

    fn parse(tag: &Tag) -> Option<Self> {
        let kind = canonical_number::<u16>(required(tag, Self::NAME, 2, 1)?)?;
        Some(Self::new(Kind(kind)))
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME.to_string(), self.kind.to_string()])
    }
}

impl_memory_size!(KindTag { kind });

/// How a relay in an `r` tag is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayUsage {
    Read,
    Write,
}

impl RelayUsage {
    pub fn as_str(self) -> &'static str {
        match self {
            RelayUsage::Read => "read",
            RelayUsage::Write => "write",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(RelayUsage::Read),
            "write" => Some(RelayUsage::Write),
            _ => None,
        }
    }
}

impl MemorySize for RelayUsage {
    fn count_memory(&self) -> usize {
        REFERENCE_SLOT
    }
}

/// `["r", <url>, <read|write>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceTag {
    pub url: String,
    pub usage: Option<RelayUsage>,
}

impl ReferenceTag {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            usage: None,
        }
    }
}

impl TagCodec for ReferenceTag {
    const NAME: &'static str = "r";

    fn parse(tag: &Tag) -> Option<Self> {
        let url = required(tag, Self::NAME, 3, 1)?;
        let usage = match tag.optional(2) {
            Some(usage) => Some(RelayUsage::parse(usage)?),
            None => None,
        };
        Some(Self {
            url: url.to_string(),
            usage,
        })
    }

    fn assemble(&self) -> Tag {
        Tag::with_optional(
            Self::NAME,
            &[&self.url],
            &[self.usage.map(RelayUsage::as_str)],
        )
    }
}

impl_memory_size!(ReferenceTag { url, usage });

text_tag!(
    /// `["d", <identifier>]`: the stable part of an addressable event.
    IdentifierTag,
    "d",
    identifier
);

text_tag!(
    /// `["t", <hashtag>]`, kept exactly as written.
    HashtagTag,
    "t",
    hashtag
);

text_tag!(GeohashTag, "g", geohash);

text_tag!(
    /// `["relay", <url>]`, used by auth events.
    RelayTag,
    "relay",
    url
);

text_tag!(ChallengeTag, "challenge", challenge);

#[cfg(test)]
mod tests {
    use super::*;

    fn id_hex() -> String {
        "aa".repeat(32)
    }

    fn pk_hex() -> String {
        "bb".repeat(32)
    }

    #[test]
    fn test_event_tag_full() {
        let tag = Tag::new(["e".to_string(), id_hex(), "wss://r".into(), "reply".into(), pk_hex()]);
        let parsed = EventTag::parse(&tag).unwrap();
        assert_eq!(parsed.relay.as_deref(), Some("wss://r"));
        assert_eq!(parsed.marker, Some(Marker::Reply));
        assert_eq!(parsed.author.unwrap().to_hex(), pk_hex());
        assert!(parsed.assemble().equivalent(&tag));
    }

    #[test]
    fn test_event_tag_marker_without_relay() {
        let tag = Tag::new(["e".to_string(), id_hex(), String::new(), "root".into()]);
        let parsed = EventTag::parse(&tag).unwrap();
        assert_eq!(parsed.relay, None);
        assert_eq!(parsed.marker, Some(Marker::Root));
        assert_eq!(parsed.assemble(), tag);
    }

    #[test]
    fn test_event_tag_rejects_bad_id_and_author() {
        assert!(EventTag::parse(&Tag::from(["e", "xyz"])).is_none());
        assert!(EventTag::parse(&Tag::from(["e"])).is_none());
        let bad_author = Tag::new(["e".to_string(), id_hex(), String::new(), String::new(), "zz".into()]);
        assert!(EventTag::parse(&bad_author).is_none());
    }

    #[test]
    fn test_unknown_marker_preserved() {
        let tag = Tag::new(["e".to_string(), id_hex(), String::new(), "fork".into()]);
        let parsed = EventTag::parse(&tag).unwrap();
        assert_eq!(parsed.marker, Some(Marker::Other("fork".into())));
        assert_eq!(parsed.assemble(), tag);
    }

    #[test]
    fn test_name_mismatch_is_none() {
        let tag = Tag::new(["p".to_string(), id_hex()]);
        assert!(EventTag::parse(&tag).is_none());
        assert!(PubkeyTag::parse(&tag).is_some());
        assert!(AddressTag::parse(&tag).is_none());
    }

    #[test]
    fn test_kind_tag() {
        let tag = Tag::from(["k", "30023"]);
        assert_eq!(KindTag::parse(&tag).unwrap().kind, Kind(30023));
        assert!(KindTag::parse(&Tag::from(["k", "70000"])).is_none());
        assert!(KindTag::parse(&Tag::from(["k", "one"])).is_none());
    }

    #[test]
    fn test_quote_tag_event_and_address() {
        let tag = Tag::new(["q".to_string(), id_hex()]);
        assert!(matches!(
            QuoteTag::parse(&tag).unwrap().target,
            QuoteTarget::Event(_)
        ));

        let address = format!("30023:{}:post", pk_hex());
        let tag = Tag::new(["q".to_string(), address, "wss://r".into()]);
        let parsed = QuoteTag::parse(&tag).unwrap();
        assert!(matches!(parsed.target, QuoteTarget::Address(_)));
        assert_eq!(parsed.assemble(), tag);
    }

    #[test]
    fn test_reference_usage() {
        let tag = Tag::from(["r", "wss://relay.example", "write"]);
        let parsed = ReferenceTag::parse(&tag).unwrap();
        assert_eq!(parsed.usage, Some(RelayUsage::Write));
        assert!(ReferenceTag::parse(&Tag::from(["r", "wss://x", "sometimes"])).is_none());
    }

    #[test]
    fn test_extra_fields_rejected() {
        assert!(HashtagTag::parse(&Tag::from(["t", "nostr", "extra"])).is_none());
        assert!(HashtagTag::parse(&Tag::from(["t", "nostr", ""])).is_some());
    }
}
