//! Proptest generators for property-based testing.
//!
//! Every built-in tag dialect has a strategy producing values that survive
//! `assemble` then `parse` unchanged. [`arb_typed_tag`] draws from all of
//! them.

use proptest::prelude::*;

use quill_core::tag::{
    AddressTag, AltTag, AmountTag, BlurhashTag, Bolt11Tag, ChallengeTag, ClientTag,
    ClosedAtTag, ConsensusThresholdTag, ContentWarningTag, DescriptionTag, Dimensions,
    DimensionsTag, DurationTag, EmojiTag, EventTag, ExpirationTag, FileUrlTag, GeohashTag,
    GoalTag, HashTag, HashtagTag, IdentifierTag, ImageTag, KindTag, LabelNamespaceTag, LabelTag,
    LnurlTag, Marker, MimeTypeTag, NonceTag, PollOptionTag, PreimageTag, ProxyTag, PubkeyTag,
    PublishedAtTag, QuoteTag, QuoteTarget, ReferenceTag, RelayTag, RelayUsage, RelaysTag,
    SizeTag, SubjectTag, SummaryTag, TitleTag, TypedTag, ValueMaximumTag, ValueMinimumTag,
    WaveformTag, ZapRaiserTag, ZapSplitTag,
};
use quill_core::{Address, EventId, Keypair, Kind, PublicKey, Tag, Timestamp, UnsignedEvent};
use quill_filter::{Filter, Values};

// ─────────────────────────────────────────────────────────────────────────────
// Primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_filter_map("secret out of range", |secret| {
        Keypair::from_secret_bytes(&secret).ok()
    })
}

/// Generate a random EventId.
pub fn event_id() -> impl Strategy<Value = EventId> {
    any::<[u8; 32]>().prop_map(EventId)
}

/// Generate 32 bytes as a PublicKey. Not necessarily a point on the curve.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    any::<[u8; 32]>().prop_map(PublicKey)
}

pub fn kind() -> impl Strategy<Value = Kind> {
    any::<u16>().prop_map(Kind)
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    0u64..=4_000_000_000u64
}

/// Free text, possibly empty.
pub fn text() -> impl Strategy<Value = String> {
    "\\PC{0,24}".prop_map(String::from)
}

/// Free text that is never empty; used for fields where `""` means absent.
pub fn present_text() -> impl Strategy<Value = String> {
    "\\PC{1,24}".prop_map(String::from)
}

pub fn relay_url() -> impl Strategy<Value = String> {
    "wss://[a-z]{1,12}\\.example(/[a-z]{1,6})?".prop_map(String::from)
}

pub fn optional_relay() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(relay_url())
}

pub fn address() -> impl Strategy<Value = Address> {
    (kind(), public_key(), text())
        .prop_map(|(kind, pubkey, identifier)| Address::new(kind, pubkey, identifier))
}

pub fn dimensions() -> impl Strategy<Value = Dimensions> {
    (any::<u32>(), any::<u32>()).prop_map(|(width, height)| Dimensions::new(width, height))
}

pub fn marker() -> impl Strategy<Value = Marker> {
    prop_oneof![
        Just(Marker::Root),
        Just(Marker::Reply),
        Just(Marker::Mention),
        "x-[a-z]{1,8}".prop_map(Marker::Other),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialects
// ─────────────────────────────────────────────────────────────────────────────

pub fn event_tag() -> impl Strategy<Value = EventTag> {
    (
        event_id(),
        optional_relay(),
        proptest::option::of(marker()),
        proptest::option::of(public_key()),
    )
        .prop_map(|(id, relay, marker, author)| EventTag {
            id,
            relay,
            marker,
            author,
        })
}

pub fn pubkey_tag() -> impl Strategy<Value = PubkeyTag> {
    (public_key(), optional_relay(), proptest::option::of(present_text())).prop_map(
        |(pubkey, relay, petname)| PubkeyTag {
            pubkey,
            relay,
            petname,
        },
    )
}

pub fn address_tag() -> impl Strategy<Value = AddressTag> {
    (address(), optional_relay()).prop_map(|(address, relay)| AddressTag { address, relay })
}

pub fn quote_tag() -> impl Strategy<Value = QuoteTag> {
    let target = prop_oneof![
        event_id().prop_map(QuoteTarget::Event),
        address().prop_map(QuoteTarget::Address),
    ];
    (target, optional_relay(), proptest::option::of(public_key())).prop_map(
        |(target, relay, author)| QuoteTag {
            target,
            relay,
            author,
        },
    )
}

pub fn reference_tag() -> impl Strategy<Value = ReferenceTag> {
    let usage = proptest::option::of(prop_oneof![Just(RelayUsage::Read), Just(RelayUsage::Write)]);
    (relay_url(), usage).prop_map(|(url, usage)| ReferenceTag { url, usage })
}

pub fn image_tag() -> impl Strategy<Value = ImageTag> {
    (relay_url(), proptest::option::of(dimensions()))
        .prop_map(|(url, dimensions)| ImageTag { url, dimensions })
}

pub fn client_tag() -> impl Strategy<Value = ClientTag> {
    (text(), proptest::option::of(address()), optional_relay()).prop_map(
        |(name, address, relay)| ClientTag {
            name,
            address,
            relay,
        },
    )
}

pub fn emoji_tag() -> impl Strategy<Value = EmojiTag> {
    ("[A-Za-z0-9_-]{1,16}", relay_url()).prop_map(|(shortcode, url)| EmojiTag { shortcode, url })
}

pub fn label_tag() -> impl Strategy<Value = LabelTag> {
    (text(), proptest::option::of(present_text()))
        .prop_map(|(label, namespace)| LabelTag { label, namespace })
}

pub fn proxy_tag() -> impl Strategy<Value = ProxyTag> {
    (text(), "[a-z]{1,10}").prop_map(|(id, protocol)| ProxyTag { id, protocol })
}

/// Weights on an eighth grid; they print and parse back exactly.
pub fn zap_split_tag() -> impl Strategy<Value = ZapSplitTag> {
    let weight = proptest::option::of((0u32..100_000).prop_map(|n| f64::from(n) / 8.0));
    (public_key(), optional_relay(), weight).prop_map(|(pubkey, relay, weight)| ZapSplitTag {
        pubkey,
        relay,
        weight,
    })
}

pub fn relays_tag() -> impl Strategy<Value = RelaysTag> {
    proptest::collection::vec(relay_url(), 1..5).prop_map(|relays| RelaysTag { relays })
}

pub fn goal_tag() -> impl Strategy<Value = GoalTag> {
    (event_id(), optional_relay()).prop_map(|(goal, relay)| GoalTag { goal, relay })
}

/// Whole percentages only; anything finer is lost on the wire.
pub fn consensus_threshold_tag() -> impl Strategy<Value = ConsensusThresholdTag> {
    (0u32..=100).prop_map(|percent| ConsensusThresholdTag::new(f64::from(percent) / 100.0))
}

// ─────────────────────────────────────────────────────────────────────────────
// Any dialect
// ─────────────────────────────────────────────────────────────────────────────

fn reference_family() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        event_tag().prop_map(TypedTag::from),
        pubkey_tag().prop_map(TypedTag::from),
        address_tag().prop_map(TypedTag::from),
        quote_tag().prop_map(TypedTag::from),
        kind().prop_map(|kind| KindTag::new(kind).into()),
        text().prop_map(|s| IdentifierTag::new(s).into()),
        text().prop_map(|s| HashtagTag::new(s).into()),
        reference_tag().prop_map(TypedTag::from),
        "[0-9b-hjkmnp-z]{1,12}".prop_map(|s| GeohashTag::new(s).into()),
        relay_url().prop_map(|s| RelayTag::new(s).into()),
    ]
}

fn metadata_family() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        text().prop_map(|s| ChallengeTag::new(s).into()),
        text().prop_map(|s| SubjectTag::new(s).into()),
        text().prop_map(|s| TitleTag::new(s).into()),
        text().prop_map(|s| SummaryTag::new(s).into()),
        text().prop_map(|s| AltTag::new(s).into()),
        image_tag().prop_map(TypedTag::from),
        timestamp().prop_map(|ts| PublishedAtTag::new(ts).into()),
        timestamp().prop_map(|ts| ExpirationTag::new(ts).into()),
        proptest::option::of(present_text())
            .prop_map(|reason| ContentWarningTag { reason }.into()),
        client_tag().prop_map(TypedTag::from),
    ]
}

fn labelling_family() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        emoji_tag().prop_map(TypedTag::from),
        (any::<u64>(), any::<u8>())
            .prop_map(|(nonce, difficulty)| NonceTag { nonce, difficulty }.into()),
        text().prop_map(|s| LabelNamespaceTag::new(s).into()),
        label_tag().prop_map(TypedTag::from),
        proxy_tag().prop_map(TypedTag::from),
    ]
}

fn zap_family() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        any::<u64>().prop_map(|sats| ZapRaiserTag::new(sats).into()),
        zap_split_tag().prop_map(TypedTag::from),
        any::<u64>().prop_map(|msats| AmountTag::new(msats).into()),
        "lnbc[0-9a-z]{10,40}".prop_map(|s| Bolt11Tag::new(s).into()),
        "[0-9a-f]{64}".prop_map(|s| PreimageTag::new(s).into()),
        text().prop_map(|s| DescriptionTag::new(s).into()),
        relays_tag().prop_map(TypedTag::from),
        "lnurl[0-9a-z]{10,30}".prop_map(|s| LnurlTag::new(s).into()),
        goal_tag().prop_map(TypedTag::from),
    ]
}

fn media_family() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        proptest::collection::vec(any::<u32>(), 0..32)
            .prop_map(|amplitudes| WaveformTag::new(amplitudes).into()),
        any::<u32>().prop_map(|s| DurationTag::new(s).into()),
        relay_url().prop_map(|s| FileUrlTag::new(s).into()),
        "[a-z]{1,8}/[a-z0-9.+-]{1,12}".prop_map(|s| MimeTypeTag::new(s).into()),
        any::<[u8; 32]>().prop_map(|sha256| HashTag { sha256 }.into()),
        any::<u64>().prop_map(|bytes| SizeTag::new(bytes).into()),
        dimensions().prop_map(|dimensions| DimensionsTag { dimensions }.into()),
        "[0-9A-Za-z#$%*+,.:;=?@^_{|}~-]{6,30}".prop_map(|s| BlurhashTag::new(s).into()),
    ]
}

fn poll_family() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        (any::<u32>(), text()).prop_map(|(index, label)| PollOptionTag::new(index, label).into()),
        consensus_threshold_tag().prop_map(TypedTag::from),
        any::<u64>().prop_map(|sats| ValueMaximumTag::new(sats).into()),
        any::<u64>().prop_map(|sats| ValueMinimumTag::new(sats).into()),
        timestamp().prop_map(|ts| ClosedAtTag::new(ts).into()),
    ]
}

/// Any built-in dialect value.
pub fn arb_typed_tag() -> impl Strategy<Value = TypedTag> {
    prop_oneof![
        reference_family(),
        metadata_family(),
        labelling_family(),
        zap_family(),
        media_family(),
        poll_family(),
    ]
}

/// A raw tag with arbitrary name and fields. Most will not parse.
pub fn raw_tag() -> impl Strategy<Value = Tag> {
    proptest::collection::vec("[a-z_-]{0,6}|[0-9]{1,4}|\\PC{0,8}", 0..6).prop_map(Tag::from)
}

/// A tri-state allow-set drawn from `values`.
pub fn values_of<S>(values: S) -> impl Strategy<Value = Values<S::Value>>
where
    S: Strategy,
    S::Value: Clone,
{
    prop_oneof![
        2 => Just(Values::Absent),
        1 => Just(Values::Empty),
        3 => proptest::collection::vec(values, 1..4).prop_map(Values::Populated),
    ]
}

/// Tag constraints are never absent: an absent entry and a missing key mean
/// the same thing, and only the missing key survives the wire.
fn tag_values() -> impl Strategy<Value = Values<String>> {
    proptest::collection::vec("[a-z0-9]{1,8}", 0..4).prop_map(Values::from_vec)
}

/// A relay filter, sometimes unsatisfiable.
pub fn filter() -> impl Strategy<Value = Filter> {
    (
        values_of(event_id()),
        values_of(public_key()),
        values_of(kind()),
        proptest::collection::btree_map("[a-z]", tag_values(), 0..3),
        proptest::option::of(timestamp()),
        proptest::option::of(timestamp()),
        proptest::option::of(1u64..500),
    )
        .prop_map(|(ids, authors, kinds, tags, since, until, limit)| Filter {
            ids,
            authors,
            kinds,
            tags,
            since,
            until,
            limit,
        })
}

/// Parameters for generating a draft.
#[derive(Debug, Clone)]
pub struct DraftParams {
    pub keypair: Keypair,
    pub kind: Kind,
    pub created_at: Timestamp,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl Arbitrary for DraftParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            keypair(),
            kind(),
            timestamp(),
            proptest::collection::vec(arb_typed_tag().prop_map(|t| t.assemble()), 0..6),
            "\\PC{0,64}",
        )
            .prop_map(|(keypair, kind, created_at, tags, content)| DraftParams {
                keypair,
                kind,
                created_at,
                tags,
                content,
            })
            .boxed()
    }
}

/// Build the draft described by `params`.
pub fn draft_from_params(params: &DraftParams) -> UnsignedEvent {
    UnsignedEvent::new(
        params.keypair.public_key(),
        params.kind,
        params.tags.clone(),
        params.content.clone(),
    )
    .created_at(params.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::TagRegistry;

    proptest! {
        #[test]
        fn test_assemble_then_parse_is_identity(typed in arb_typed_tag()) {
            let tag = typed.assemble();
            prop_assert_eq!(tag.name(), typed.name());
            prop_assert_eq!(TypedTag::parse(&tag), Some(typed));
        }

        #[test]
        fn test_parse_then_assemble_is_equivalent(tag in raw_tag()) {
            if let Some(typed) = TypedTag::parse(&tag) {
                prop_assert!(typed.assemble().equivalent(&tag), "{:?} -> {:?}", tag, typed);
            }
        }

        #[test]
        fn test_trailing_empty_fields_are_ignored(typed in arb_typed_tag(), extra in 1usize..3) {
            let mut parts = typed.assemble().into_inner();
            parts.extend(std::iter::repeat(String::new()).take(extra));
            let padded = Tag::from(parts);
            prop_assert_eq!(TypedTag::parse(&padded), Some(typed));
        }

        #[test]
        fn test_wrong_name_never_parses(
            typed in arb_typed_tag(),
            pick in any::<prop::sample::Index>(),
        ) {
            let names: Vec<&str> = TypedTag::standard_names()
                .iter()
                .copied()
                .filter(|name| *name != typed.name())
                .collect();
            let other = names[pick.index(names.len())];

            let mut parts = typed.assemble().into_inner();
            parts[0] = other.to_string();
            let renamed = Tag::from(parts);

            let own_parser = TagRegistry::standard()
                .parser(typed.name())
                .expect("every dialect is registered");
            prop_assert_eq!(own_parser(&renamed), None);
        }

        #[test]
        fn test_unsatisfiable_filters_stay_off_the_wire(filter in filter()) {
            match filter.to_json() {
                None => prop_assert!(filter.is_unsatisfiable()),
                Some(json) => {
                    let decoded = Filter::from_json(&json).unwrap();
                    prop_assert!(!decoded.is_unsatisfiable());
                    prop_assert_eq!(decoded, filter);
                }
            }
        }

        #[test]
        fn test_draft_id_deterministic(params: DraftParams) {
            let d1 = draft_from_params(&params);
            let d2 = draft_from_params(&params);
            prop_assert_eq!(d1.id(), d2.id());
        }

        #[test]
        fn test_signed_draft_verifies(params: DraftParams) {
            let event = draft_from_params(&params).sign_with(&params.keypair).unwrap();
            prop_assert!(event.verify().is_ok());
        }
    }
}
