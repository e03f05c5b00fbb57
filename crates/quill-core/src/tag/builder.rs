//! Tag array assembly for one event under construction.

use crate::crypto::PublicKey;
use crate::event::UnsignedEvent;
use crate::tag::{
    AddressTag, AltTag, ClientTag, EventTag, ExpirationTag, HashtagTag, PubkeyTag, SubjectTag,
    Tag, TagCodec,
};
use crate::types::{Kind, Timestamp};

/// Either kind of pointer at another event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Event(EventTag),
    Address(AddressTag),
}

impl From<EventTag> for Reference {
    fn from(tag: EventTag) -> Self {
        Reference::Event(tag)
    }
}

impl From<AddressTag> for Reference {
    fn from(tag: AddressTag) -> Self {
        Reference::Address(tag)
    }
}

/// Accumulates the tags of one event in insertion order.
///
/// Order is part of the event id, so the builder never reorders: a unique
/// replacement takes the slot of the first tag it replaces.
#[derive(Debug, Clone)]
pub struct TagArrayBuilder {
    kind: Kind,
    tags: Vec<Tag>,
}

impl TagArrayBuilder {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            tags: Vec::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Append a raw tag.
    pub fn add(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Append a typed tag.
    pub fn add_typed<T: TagCodec>(self, value: &T) -> Self {
        self.add(value.assemble())
    }

    /// Add a tag whose name may appear once. Existing tags with the same
    /// name are removed and the new one takes the first one's position.
    pub fn add_unique(self, tag: impl Into<Tag>) -> Self {
        let tag = tag.into();
        let name = tag.name().to_string();
        self.replace_where(tag, |existing| existing.is_named(&name))
    }

    /// Add a tag whose (name, primary value) pair may appear once.
    pub fn add_unique_value(self, tag: impl Into<Tag>) -> Self {
        let tag = tag.into();
        let name = tag.name().to_string();
        let value = tag.value().map(str::to_string);
        self.replace_where(tag, |existing| {
            existing.is_named(&name) && existing.value() == value.as_deref()
        })
    }

    fn replace_where(mut self, tag: Tag, matches: impl Fn(&Tag) -> bool) -> Self {
        match self.tags.iter().position(|existing| matches(existing)) {
            Some(first) => {
                self.tags[first] = tag;
                let mut index = 0;
                self.tags.retain(|existing| {
                    let keep = index <= first || !matches(existing);
                    index += 1;
                    keep
                });
            }
            None => self.tags.push(tag),
        }
        self
    }

    /// Reference another event by id or by address.
    pub fn reference(self, reference: impl Into<Reference>) -> Self {
        match reference.into() {
            Reference::Event(tag) => self.add_unique_value(tag.assemble()),
            Reference::Address(tag) => self.add_unique_value(tag.assemble()),
        }
    }

    /// Add a `p` tag per mentioned pubkey, skipping ones already present.
    pub fn mentions<I>(self, pubkeys: I) -> Self
    where
        I: IntoIterator<Item = PubkeyTag>,
    {
        pubkeys
            .into_iter()
            .fold(self, |builder, mention| builder.add_unique_value(mention.assemble()))
    }

    /// Mention authors by key alone.
    pub fn mention_keys<I>(self, pubkeys: I) -> Self
    where
        I: IntoIterator<Item = PublicKey>,
    {
        self.mentions(pubkeys.into_iter().map(PubkeyTag::new))
    }

    pub fn subject(self, subject: impl Into<String>) -> Self {
        self.add_unique(SubjectTag::new(subject).assemble())
    }

    /// Add `t` tags, one per distinct hashtag.
    pub fn hashtags<I, S>(self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        hashtags.into_iter().fold(self, |builder, hashtag| {
            builder.add_unique_value(HashtagTag::new(hashtag).assemble())
        })
    }

    pub fn alt(self, text: impl Into<String>) -> Self {
        self.add_unique(AltTag::new(text).assemble())
    }

    pub fn expiration(self, timestamp: Timestamp) -> Self {
        self.add_unique(ExpirationTag::new(timestamp).assemble())
    }

    pub fn client(self, client: &ClientTag) -> Self {
        self.add_unique(client.assemble())
    }

    /// The tags, in insertion order.
    pub fn build(self) -> Vec<Tag> {
        self.tags
    }

    /// Finish as an unsigned draft timestamped now.
    pub fn into_draft(self, pubkey: PublicKey, content: impl Into<String>) -> UnsignedEvent {
        let kind = self.kind;
        UnsignedEvent::new(pubkey, kind, self.build(), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::types::EventId;

    fn pk(byte: u8) -> PublicKey {
        PublicKey::from_bytes([byte; 32])
    }

    #[test]
    fn test_add_preserves_order() {
        let tags = TagArrayBuilder::new(Kind(1))
            .add(["t", "b"])
            .add(["t", "a"])
            .add(["subject", "x"])
            .build();
        let names: Vec<_> = tags.iter().map(|t| t.value().unwrap_or("")).collect();
        assert_eq!(names, vec!["b", "a", "x"]);
    }

    #[test]
    fn test_add_unique_replaces_in_place() {
        let repo_a = Address::new(Kind(30617), pk(1), "repo-a");
        let repo_b = Address::new(Kind(30617), pk(1), "repo-b");
        let tags = TagArrayBuilder::new(Kind(1621))
            .add_typed(&SubjectTag::new("bug"))
            .add_unique(AddressTag::new(repo_a).assemble())
            .add(["t", "ui"])
            .add_unique(AddressTag::new(repo_b.clone()).assemble())
            .build();

        assert_eq!(tags.len(), 3);
        assert_eq!(tags[1], AddressTag::new(repo_b).assemble());
        assert!(tags[2].is_named("t"));
    }

    #[test]
    fn test_add_unique_collapses_duplicates() {
        let tags = TagArrayBuilder::new(Kind(1))
            .add(["alt", "one"])
            .add(["t", "x"])
            .add(["alt", "two"])
            .alt("three")
            .build();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].as_slice(), &["alt", "three"]);
        assert!(tags[1].is_named("t"));
    }

    #[test]
    fn test_mentions_deduplicate_by_key() {
        let tags = TagArrayBuilder::new(Kind(1))
            .mention_keys([pk(1), pk(2), pk(1)])
            .build();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_reference_and_hashtags() {
        let id = EventId::from_bytes([7; 32]);
        let tags = TagArrayBuilder::new(Kind(1))
            .reference(EventTag::new(id))
            .hashtags(["rust", "nostr", "rust"])
            .subject("hello")
            .subject("hello again")
            .build();
        assert_eq!(tags.len(), 4);
        assert!(tags[0].is_named("e"));
        assert_eq!(tags[3].as_slice(), &["subject", "hello again"]);
    }
}
