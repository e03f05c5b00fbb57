//! Closed enum over every built-in dialect, plus a name-keyed registry that
//! callers can extend.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::memory::{MemorySize, REFERENCE_SLOT};
use crate::tag::{
    AddressTag, AltTag, AmountTag, BlurhashTag, Bolt11Tag, ChallengeTag, ClientTag,
    ClosedAtTag, ConsensusThresholdTag, ContentWarningTag, DescriptionTag, DimensionsTag,
    DurationTag, EmojiTag, EventTag, ExpirationTag, FileUrlTag, GeohashTag, GoalTag, HashTag,
    HashtagTag, IdentifierTag, ImageTag, KindTag, LabelNamespaceTag, LabelTag, LnurlTag,
    MimeTypeTag, NonceTag, PollOptionTag, PreimageTag, ProxyTag, PubkeyTag, PublishedAtTag,
    QuoteTag, ReferenceTag, RelayTag, RelaysTag, SizeTag, SubjectTag, SummaryTag, Tag,
    TagCodec, TitleTag, ValueMaximumTag, ValueMinimumTag, WaveformTag, ZapRaiserTag,
    ZapSplitTag,
};

/// A registry entry: decode a raw tag into a [`TypedTag`].
pub type ParseFn = fn(&Tag) -> Option<TypedTag>;

fn parse_as<T>(tag: &Tag) -> Option<TypedTag>
where
    T: TagCodec + Into<TypedTag>,
{
    T::parse(tag).map(Into::into)
}

fn parse_custom(tag: &Tag) -> Option<TypedTag> {
    Some(TypedTag::Custom(tag.clone()))
}

macro_rules! typed_tags {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Any decoded tag.
        ///
        /// `Custom` carries tags accepted through [`TagRegistry::register_custom`]
        /// for names no built-in dialect owns; it is never produced by
        /// [`TypedTag::parse`].
        #[derive(Debug, Clone, PartialEq)]
        pub enum TypedTag {
            $($variant($ty),)*
            Custom(Tag),
        }

        impl TypedTag {
            /// Decode with the built-in dialect owning `tag`'s name.
            pub fn parse(tag: &Tag) -> Option<Self> {
                let name = tag.name();
                $(
                    if name == <$ty as TagCodec>::NAME {
                        return parse_as::<$ty>(tag);
                    }
                )*
                None
            }

            pub fn assemble(&self) -> Tag {
                match self {
                    $(TypedTag::$variant(value) => value.assemble(),)*
                    TypedTag::Custom(tag) => tag.clone(),
                }
            }

            pub fn name(&self) -> &str {
                match self {
                    $(TypedTag::$variant(_) => <$ty as TagCodec>::NAME,)*
                    TypedTag::Custom(tag) => tag.name(),
                }
            }

            /// Names of every built-in dialect.
            pub fn standard_names() -> &'static [&'static str] {
                const NAMES: &[&str] = &[$(<$ty as TagCodec>::NAME,)*];
                NAMES
            }

            fn standard_parsers() -> Vec<(&'static str, ParseFn)> {
                vec![$((<$ty as TagCodec>::NAME, parse_as::<$ty> as ParseFn),)*]
            }
        }

        $(
            impl From<$ty> for TypedTag {
                fn from(value: $ty) -> Self {
                    TypedTag::$variant(value)
                }
            }
        )*

        impl MemorySize for TypedTag {
            fn count_memory(&self) -> usize {
                REFERENCE_SLOT
                    + match self {
                        $(TypedTag::$variant(value) => value.count_memory(),)*
                        TypedTag::Custom(tag) => tag.count_memory(),
                    }
            }
        }
    };
}

typed_tags! {
    // references
    Event(EventTag),
    Pubkey(PubkeyTag),
    Address(AddressTag),
    Quote(QuoteTag),
    Kind(KindTag),
    Identifier(IdentifierTag),
    Hashtag(HashtagTag),
    Reference(ReferenceTag),
    Geohash(GeohashTag),
    Relay(RelayTag),
    Challenge(ChallengeTag),
    // metadata
    Subject(SubjectTag),
    Title(TitleTag),
    Summary(SummaryTag),
    Alt(AltTag),
    Image(ImageTag),
    PublishedAt(PublishedAtTag),
    Expiration(ExpirationTag),
    ContentWarning(ContentWarningTag),
    Client(ClientTag),
    Emoji(EmojiTag),
    Nonce(NonceTag),
    LabelNamespace(LabelNamespaceTag),
    Label(LabelTag),
    Proxy(ProxyTag),
    // zaps
    ZapRaiser(ZapRaiserTag),
    ZapSplit(ZapSplitTag),
    Amount(AmountTag),
    Bolt11(Bolt11Tag),
    Preimage(PreimageTag),
    Description(DescriptionTag),
    Relays(RelaysTag),
    Lnurl(LnurlTag),
    Goal(GoalTag),
    // media
    Waveform(WaveformTag),
    Duration(DurationTag),
    FileUrl(FileUrlTag),
    MimeType(MimeTypeTag),
    Hash(HashTag),
    Size(SizeTag),
    Dimensions(DimensionsTag),
    Blurhash(BlurhashTag),
    // polls
    PollOption(PollOptionTag),
    ConsensusThreshold(ConsensusThresholdTag),
    ValueMaximum(ValueMaximumTag),
    ValueMinimum(ValueMinimumTag),
    ClosedAt(ClosedAtTag),
}

/// Name → parser table.
///
/// [`TagRegistry::standard`] holds every built-in dialect. Applications can
/// add their own names, or override a built-in one, without touching
/// [`TypedTag`].
#[derive(Clone)]
pub struct TagRegistry {
    parsers: HashMap<String, ParseFn>,
}

impl TagRegistry {
    /// A registry that recognizes nothing.
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// A registry with every built-in dialect.
    pub fn standard() -> Self {
        let parsers = TypedTag::standard_parsers()
            .into_iter()
            .map(|(name, parser)| (name.to_string(), parser))
            .collect();
        Self { parsers }
    }

    /// Register a parser for `name`, returning the one it replaces.
    pub fn register(&mut self, name: impl Into<String>, parser: ParseFn) -> Option<ParseFn> {
        self.parsers.insert(name.into(), parser)
    }

    /// Accept tags named `name` as [`TypedTag::Custom`].
    pub fn register_custom(&mut self, name: impl Into<String>) -> Option<ParseFn> {
        self.register(name, parse_custom)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// The parser registered for `name`.
    pub fn parser(&self, name: &str) -> Option<ParseFn> {
        self.parsers.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Decode one tag. Unknown names and malformed fields both give `None`.
    pub fn parse(&self, tag: &Tag) -> Option<TypedTag> {
        let Some(parser) = self.parsers.get(tag.name()) else {
            trace!(name = tag.name(), "no parser registered for tag");
            return None;
        };
        let parsed = parser(tag);
        if parsed.is_none() {
            trace!(name = tag.name(), len = tag.len(), "malformed tag skipped");
        }
        parsed
    }

    /// Decode every recognizable tag, preserving order and dropping the rest.
    pub fn parse_all<'a, I>(&self, tags: I) -> Vec<TypedTag>
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        tags.into_iter().filter_map(|tag| self.parse(tag)).collect()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TagRegistry").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_dialect() {
        let registry = TagRegistry::standard();
        assert_eq!(registry.len(), TypedTag::standard_names().len());
        assert_eq!(registry.len(), 47);
        for name in TypedTag::standard_names() {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_dispatch_by_name() {
        let tag = Tag::from(["k", "1"]);
        let typed = TypedTag::parse(&tag).unwrap();
        assert!(matches!(typed, TypedTag::Kind(_)));
        assert_eq!(typed.name(), "k");
        assert_eq!(typed.assemble(), tag);
        assert_eq!(TagRegistry::standard().parse(&tag), Some(typed));
    }

    #[test]
    fn test_unknown_and_malformed_are_none() {
        let registry = TagRegistry::standard();
        assert_eq!(TypedTag::parse(&Tag::from(["unknown", "x"])), None);
        assert_eq!(registry.parse(&Tag::from(["unknown", "x"])), None);
        assert_eq!(registry.parse(&Tag::from(["k", "not a kind"])), None);
        assert_eq!(registry.parse(&Tag::new(Vec::<String>::new())), None);
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = TagRegistry::standard();
        let tag = Tag::from(["streak", "12"]);
        assert_eq!(registry.parse(&tag), None);

        registry.register_custom("streak");
        let typed = registry.parse(&tag).unwrap();
        assert_eq!(typed, TypedTag::Custom(tag.clone()));
        assert_eq!(typed.name(), "streak");
        assert_eq!(typed.assemble(), tag);
    }

    #[test]
    fn test_parse_all_keeps_order() {
        let tags = vec![
            Tag::from(["t", "rust"]),
            Tag::from(["bogus"]),
            Tag::from(["subject", "hi"]),
        ];
        let typed = TagRegistry::standard().parse_all(&tags);
        assert_eq!(typed.len(), 2);
        assert_eq!(typed[0].name(), "t");
        assert_eq!(typed[1].name(), "subject");
    }
}
