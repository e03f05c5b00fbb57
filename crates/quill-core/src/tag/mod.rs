//! Tags: ordered string tuples attached to an event.
//!
//! Element 0 is the tag name; the rest are positional fields whose meaning
//! depends on the name. Each dialect is a typed value implementing
//! [`TagCodec`]: a pure `parse` that yields `None` for anything it does not
//! understand, and a total `assemble` back to a raw [`Tag`].
//!
//! Unknown or malformed tags are never an error. A tag whose name matches
//! but whose fields are missing or fail to convert parses to `None`, the same
//! as a tag with a different name.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::memory::{MemorySize, REFERENCE_SLOT};

#[macro_use]
mod macros;
pub mod builder;
pub mod media;
pub mod metadata;
pub mod polls;
pub mod references;
pub mod typed;
pub mod zaps;

pub use builder::{Reference, TagArrayBuilder};
pub use media::{
    BlurhashTag, DimensionsTag, DurationTag, FileUrlTag, HashTag, MimeTypeTag, SizeTag,
    WaveformTag,
};
pub use metadata::{
    AltTag, ClientTag, ContentWarningTag, Dimensions, EmojiTag, ExpirationTag, ImageTag,
    LabelNamespaceTag, LabelTag, NonceTag, ProxyTag, PublishedAtTag, SubjectTag, SummaryTag,
    TitleTag,
};
pub use polls::{
    ClosedAtTag, ConsensusThresholdTag, PollOptionTag, ValueMaximumTag, ValueMinimumTag,
};
pub use references::{
    AddressTag, ChallengeTag, EventTag, GeohashTag, HashtagTag, IdentifierTag, KindTag, Marker,
    PubkeyTag, QuoteTag, QuoteTarget, ReferenceTag, RelayTag, RelayUsage,
};
pub use typed::{ParseFn, TagRegistry, TypedTag};
pub use zaps::{
    AmountTag, Bolt11Tag, DescriptionTag, GoalTag, LnurlTag, PreimageTag, RelaysTag, ZapRaiserTag,
    ZapSplitTag,
};

/// A raw tag: `["name", field1, field2, ...]`.
///
/// Tags are immutable once built; construct a new one to change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Vec<String>);

impl Tag {
    /// Build a tag from its name and fields.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Build a tag from required fields followed by optional ones.
    ///
    /// Optional fields that precede a present one are written as `""` to
    /// keep positions stable; trailing absent fields are dropped.
    pub fn with_optional(name: &str, required: &[&str], optional: &[Option<&str>]) -> Self {
        let mut parts = Vec::with_capacity(1 + required.len() + optional.len());
        parts.push(name.to_string());
        parts.extend(required.iter().map(|s| s.to_string()));

        let keep = optional
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1);
        parts.extend(
            optional[..keep]
                .iter()
                .map(|field| field.unwrap_or_default().to_string()),
        );
        Self(parts)
    }

    /// The tag name, or `""` for an empty tag.
    pub fn name(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    /// Whether this tag carries the given name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name() == name
    }

    /// The field at position `index` (0 is the name).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// The primary value (position 1).
    pub fn value(&self) -> Option<&str> {
        self.get(1)
    }

    /// An optional field: present and non-empty.
    pub fn optional(&self, index: usize) -> Option<&str> {
        self.get(index).filter(|s| !s.is_empty())
    }

    /// All parts, name included.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of parts, name included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the raw parts.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Parts with trailing empty fields removed.
    pub fn trimmed(&self) -> &[String] {
        let end = self
            .0
            .iter()
            .rposition(|s| !s.is_empty())
            .map_or(0, |last| last + 1);
        &self.0[..end]
    }

    /// Tag equivalence: equal once trailing empty fields are ignored.
    ///
    /// `["e", id, ""]` and `["e", id]` carry the same meaning.
    pub fn equivalent(&self, other: &Tag) -> bool {
        self.trimmed() == other.trimmed()
    }
}

impl From<Vec<String>> for Tag {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

impl<const N: usize> From<[&str; N]> for Tag {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

impl MemorySize for Tag {
    fn count_memory(&self) -> usize {
        REFERENCE_SLOT + self.0.count_memory()
    }
}

/// The parse/assemble contract every tag dialect honors.
///
/// `parse` never panics; `assemble` is total. Whenever `parse(t)` succeeds,
/// `parse(t).assemble()` is [`Tag::equivalent`] to `t`.
pub trait TagCodec: Sized {
    /// The tag name this dialect owns.
    const NAME: &'static str;

    /// Decode a raw tag, or `None` if the name, arity or a field is wrong.
    fn parse(tag: &Tag) -> Option<Self>;

    /// Encode back to a raw tag.
    fn assemble(&self) -> Tag;

    /// Whether `tag` belongs to this dialect by name.
    fn matches_name(tag: &Tag) -> bool {
        tag.is_named(Self::NAME)
    }
}

/// Parse a number only when it is written canonically.
///
/// `"007"` or `"+7"` would parse as 7 but re-assemble as `"7"`, so they are
/// rejected to keep the round-trip law.
pub(crate) fn canonical_number<T>(s: &str) -> Option<T>
where
    T: FromStr + ToString,
{
    let value = s.parse::<T>().ok()?;
    (value.to_string() == s).then_some(value)
}

/// Name and arity guard: the tag carries `name` and at most `max_parts`
/// parts once trailing empty fields are trimmed.
pub(crate) fn fits(tag: &Tag, name: &str, max_parts: usize) -> bool {
    tag.is_named(name) && tag.trimmed().len() <= max_parts
}

/// Fetch the required field at `index` after the name and arity guard.
pub(crate) fn required<'a>(
    tag: &'a Tag,
    name: &str,
    max_parts: usize,
    index: usize,
) -> Option<&'a str> {
    if !fits(tag, name, max_parts) {
        return None;
    }
    tag.get(index)
}

/// Convert a fraction to a scaled integer, rounding to nearest.
pub(crate) fn to_scaled(value: f64, scale: f64, max: u64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let scaled = (value * scale).round();
    if scaled >= max as f64 {
        max
    } else {
        scaled as u64
    }
}

/// Convert a scaled integer back to a fraction (exact division).
pub(crate) fn from_scaled(value: u64, scale: f64) -> f64 {
    value as f64 / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_optional_keeps_positions() {
        let tag = Tag::with_optional("e", &["abc"], &[None, Some("reply")]);
        assert_eq!(tag.as_slice(), &["e", "abc", "", "reply"]);

        let tag = Tag::with_optional("e", &["abc"], &[Some("wss://r"), None]);
        assert_eq!(tag.as_slice(), &["e", "abc", "wss://r"]);

        let tag = Tag::with_optional("e", &["abc"], &[None, None]);
        assert_eq!(tag.as_slice(), &["e", "abc"]);
    }

    #[test]
    fn test_equivalence_ignores_trailing_empty() {
        let a = Tag::from(["e", "abc", ""]);
        let b = Tag::from(["e", "abc"]);
        let c = Tag::from(["e", "abc", "", "reply"]);
        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&c));
    }

    #[test]
    fn test_empty_tag_has_empty_name() {
        let tag = Tag::new(Vec::<String>::new());
        assert_eq!(tag.name(), "");
        assert!(tag.value().is_none());
    }

    #[test]
    fn test_optional_treats_empty_as_absent() {
        let tag = Tag::from(["p", "abc", ""]);
        assert_eq!(tag.optional(2), None);
        assert_eq!(tag.optional(1), Some("abc"));
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number::<u64>("42"), Some(42));
        assert_eq!(canonical_number::<u64>("042"), None);
        assert_eq!(canonical_number::<u64>("+42"), None);
        assert_eq!(canonical_number::<u64>("-1"), None);
        assert_eq!(canonical_number::<u64>("4.2"), None);
    }

    #[test]
    fn test_scaled_rounding() {
        assert_eq!(to_scaled(0.4567, 100.0, 100), 46);
        assert_eq!(to_scaled(0.455, 100.0, 100), 46);
        assert_eq!(to_scaled(1.7, 100.0, 100), 100);
        assert_eq!(to_scaled(-0.2, 100.0, 100), 0);
        assert_eq!(from_scaled(46, 100.0), 0.46);
    }

    #[test]
    fn test_memory_grows_with_payload() {
        let short = Tag::new(["t".to_string(), "a".repeat(10)]);
        let long = Tag::new(["t".to_string(), "a".repeat(100)]);
        assert!(long.count_memory() > short.count_memory());
        assert_eq!(long.count_memory() - short.count_memory(), 90);

        let wider = Tag::new(["t".to_string(), "a".repeat(10), String::new()]);
        assert_eq!(
            wider.count_memory() - short.count_memory(),
            REFERENCE_SLOT + crate::memory::STRING_OVERHEAD
        );
    }

    #[test]
    fn test_tag_serializes_as_array() {
        let tag = Tag::from(["t", "nostr"]);
        assert_eq!(serde_json::to_string(&tag).unwrap(), r#"["t","nostr"]"#);
    }
}
