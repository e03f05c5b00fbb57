//! Drafts for the event kinds the client composes.
//!
//! Each function is pure: it picks the right kind and tag layout for an
//! action and returns an [`UnsignedEvent`] stamped with the current time.
//! Signing happens elsewhere.

use std::collections::BTreeSet;

use crate::address::Address;
use crate::crypto::PublicKey;
use crate::event::{Event, UnsignedEvent};
use crate::tag::{
    AddressTag, ClosedAtTag, ConsensusThresholdTag, DurationTag, EventTag, HashtagTag, KindTag,
    Marker, PollOptionTag, PubkeyTag, ReferenceTag, SubjectTag, Tag, TagArrayBuilder, TagCodec,
    ValueMaximumTag, ValueMinimumTag, WaveformTag, ZapRaiserTag,
};
use crate::types::{EventId, Kind, Timestamp};

/// Optional relay hints for an action on someone else's event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepostHints {
    /// Where the target event can be fetched.
    pub event_relay: Option<String>,
    /// Where the target's author publishes.
    pub author_relay: Option<String>,
}

impl RepostHints {
    pub fn new(event_relay: Option<String>, author_relay: Option<String>) -> Self {
        Self {
            event_relay,
            author_relay,
        }
    }
}

/// The two repost layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepostShape {
    /// Kind 6, only for text notes.
    ShortForm,
    /// Kind 16, for everything else; names the target kind in a `k` tag.
    Generic,
}

impl RepostShape {
    pub fn for_kind(target: Kind) -> Self {
        if target == Kind::TEXT_NOTE {
            RepostShape::ShortForm
        } else {
            RepostShape::Generic
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            RepostShape::ShortForm => Kind::REPOST,
            RepostShape::Generic => Kind::GENERIC_REPOST,
        }
    }
}

fn target_event_tag(target: &Event, hints: &RepostHints) -> EventTag {
    EventTag {
        id: *target.id(),
        relay: hints.event_relay.clone(),
        marker: None,
        author: None,
    }
}

fn target_author_tag(target: &Event, hints: &RepostHints) -> PubkeyTag {
    PubkeyTag {
        pubkey: *target.pubkey(),
        relay: hints.author_relay.clone(),
        petname: None,
    }
}

fn target_address_tag(target: &Event, hints: &RepostHints) -> Option<AddressTag> {
    target.address().map(|address| AddressTag {
        address,
        relay: hints.event_relay.clone(),
    })
}

/// Repost `target`, choosing the layout from its kind. The content is the
/// target's wire JSON.
pub fn repost_draft(reposter: PublicKey, target: &Event, hints: &RepostHints) -> UnsignedEvent {
    let shape = RepostShape::for_kind(target.kind());
    let mut builder = TagArrayBuilder::new(shape.kind())
        .add_typed(&target_event_tag(target, hints))
        .add_typed(&target_author_tag(target, hints));

    if shape == RepostShape::Generic {
        builder = builder.add_typed(&KindTag::new(target.kind()));
        if let Some(address) = target_address_tag(target, hints) {
            builder = builder.add_typed(&address);
        }
    }

    builder.into_draft(reposter, target.to_json())
}

/// React to `target` with `reaction` (`"+"`, `"-"`, or an emoji).
pub fn reaction_draft(
    reactor: PublicKey,
    target: &Event,
    reaction: &str,
    hints: &RepostHints,
) -> UnsignedEvent {
    let mut builder = TagArrayBuilder::new(Kind::REACTION)
        .add_typed(&target_event_tag(target, hints))
        .add_typed(&target_author_tag(target, hints))
        .add_typed(&KindTag::new(target.kind()));
    if let Some(address) = target_address_tag(target, hints) {
        builder = builder.add_typed(&address);
    }
    builder.into_draft(reactor, reaction)
}

/// A top-level text note.
pub fn text_note_draft<I, S>(author: PublicKey, content: &str, hashtags: I) -> UnsignedEvent
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TagArrayBuilder::new(Kind::TEXT_NOTE)
        .hashtags(hashtags)
        .into_draft(author, content)
}

/// Reply to `parent`, threading with `root`/`reply` markers.
///
/// Everyone tagged on the parent is mentioned again along with its author,
/// and a parent subject carries over as `Re: <subject>`.
pub fn reply_draft(
    author: PublicKey,
    parent: &Event,
    content: &str,
    relay_hint: Option<&str>,
) -> UnsignedEvent {
    let root = parent
        .parse_all::<EventTag>()
        .into_iter()
        .find(|tag| tag.marker == Some(Marker::Root));

    let reply_ref = EventTag {
        id: *parent.id(),
        relay: relay_hint.map(str::to_string),
        marker: None,
        author: Some(*parent.pubkey()),
    };

    let mut builder = TagArrayBuilder::new(Kind::TEXT_NOTE);
    builder = match root {
        Some(root) => builder
            .reference(EventTag {
                marker: Some(Marker::Root),
                ..root
            })
            .reference(reply_ref.with_marker(Marker::Reply)),
        None => builder.reference(reply_ref.with_marker(Marker::Root)),
    };

    let mut mentioned = vec![PubkeyTag::new(*parent.pubkey())];
    mentioned.extend(
        parent
            .parse_all::<PubkeyTag>()
            .into_iter()
            .filter(|p| &p.pubkey != parent.pubkey() && p.pubkey != author),
    );
    builder = builder.mentions(mentioned);

    if let Some(subject) = parent.parse_first::<SubjectTag>() {
        let subject = if subject.subject.starts_with("Re:") {
            subject.subject
        } else {
            format!("Re: {}", subject.subject)
        };
        builder = builder.subject(subject);
    }

    builder.into_draft(author, content)
}

/// Request deletion of the author's own events.
pub fn deletion_draft(author: PublicKey, targets: &[&Event], reason: &str) -> UnsignedEvent {
    let mut builder = TagArrayBuilder::new(Kind::DELETION);
    let mut kinds = BTreeSet::new();
    for target in targets {
        builder = builder.add_unique_value(EventTag::new(*target.id()).assemble());
        if let Some(address) = target.address() {
            builder = builder.add_unique_value(AddressTag::new(address).assemble());
        }
        kinds.insert(target.kind());
    }
    for kind in kinds {
        builder = builder.add_typed(&KindTag::new(kind));
    }
    builder.into_draft(author, reason)
}

/// One entry of a public bookmark list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bookmark {
    Event(EventId),
    Address(Address),
    Hashtag(String),
    Url(String),
}

impl Bookmark {
    fn to_tag(&self) -> Tag {
        match self {
            Bookmark::Event(id) => EventTag::new(*id).assemble(),
            Bookmark::Address(address) => AddressTag::new(address.clone()).assemble(),
            Bookmark::Hashtag(hashtag) => HashtagTag::new(hashtag.clone()).assemble(),
            Bookmark::Url(url) => ReferenceTag::new(url.clone()).assemble(),
        }
    }
}

/// Replaceable bookmark list (kind 10003). Duplicate entries collapse.
pub fn bookmark_list_draft<'a, I>(author: PublicKey, bookmarks: I) -> UnsignedEvent
where
    I: IntoIterator<Item = &'a Bookmark>,
{
    bookmarks
        .into_iter()
        .fold(TagArrayBuilder::new(Kind::BOOKMARK_LIST), |builder, bookmark| {
            builder.add_unique_value(bookmark.to_tag())
        })
        .into_draft(author, "")
}

/// Settings of a zap poll beyond its options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSettings {
    pub value_minimum: Option<u64>,
    pub value_maximum: Option<u64>,
    pub consensus_threshold: Option<f64>,
    pub closed_at: Option<Timestamp>,
}

/// Zap poll (kind 6969): options are numbered in the order given.
pub fn zap_poll_draft(
    author: PublicKey,
    question: &str,
    options: &[&str],
    settings: &PollSettings,
) -> UnsignedEvent {
    let mut builder = TagArrayBuilder::new(Kind::ZAP_POLL).add_typed(&PubkeyTag::new(author));
    for (index, label) in (0u32..).zip(options) {
        builder = builder.add_typed(&PollOptionTag::new(index, *label));
    }
    if let Some(sats) = settings.value_minimum {
        builder = builder.add_unique(ValueMinimumTag::new(sats).assemble());
    }
    if let Some(sats) = settings.value_maximum {
        builder = builder.add_unique(ValueMaximumTag::new(sats).assemble());
    }
    if let Some(fraction) = settings.consensus_threshold {
        builder = builder.add_unique(ConsensusThresholdTag::new(fraction).assemble());
    }
    if let Some(timestamp) = settings.closed_at {
        builder = builder.add_unique(ClosedAtTag::new(timestamp).assemble());
    }
    builder.into_draft(author, question)
}

/// Voice note (kind 1222): the content is the audio URL.
pub fn voice_note_draft(
    author: PublicKey,
    url: &str,
    waveform: Vec<u32>,
    duration_secs: u32,
) -> UnsignedEvent {
    TagArrayBuilder::new(Kind::VOICE_NOTE)
        .add_typed(&WaveformTag::new(waveform))
        .add_typed(&DurationTag::new(duration_secs))
        .into_draft(author, url)
}

/// Text note that raises funds toward `target_sats`.
pub fn fundraiser_draft(author: PublicKey, content: &str, target_sats: u64) -> UnsignedEvent {
    TagArrayBuilder::new(Kind::TEXT_NOTE)
        .add_unique(ZapRaiserTag::new(target_sats).assemble())
        .into_draft(author, content)
}

/// Issue against a git repository announcement (kind 1621). An issue points
/// at exactly one repository.
pub fn git_issue_draft<I, S>(
    author: PublicKey,
    repository: &Address,
    subject: &str,
    content: &str,
    labels: I,
) -> UnsignedEvent
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TagArrayBuilder::new(Kind::GIT_ISSUE)
        .add_unique(AddressTag::new(repository.clone()).assemble())
        .mention_keys([repository.pubkey])
        .subject(subject)
        .hashtags(labels)
        .into_draft(author, content)
}
