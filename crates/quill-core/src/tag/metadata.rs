//! Descriptive dialects: titles, timestamps, labels, client attribution and
//! the other metadata a note can carry.

use std::fmt;

use crate::address::Address;
use crate::memory::impl_memory_size;
use crate::tag::{canonical_number, fits, required, Tag, TagCodec};
use crate::types::Timestamp;

text_tag!(SubjectTag, "subject", subject);
text_tag!(TitleTag, "title", title);
text_tag!(SummaryTag, "summary", summary);

text_tag!(
    /// `["alt", <text>]`: human-readable fallback for clients that do not
    /// understand the event kind.
    AltTag,
    "alt",
    text
);

text_tag!(
    /// `["L", <namespace>]`
    LabelNamespaceTag,
    "L",
    namespace
);

number_tag!(PublishedAtTag, "published_at", timestamp: Timestamp);

number_tag!(
    /// `["expiration", <unix seconds>]`: relays may drop the event after it.
    ExpirationTag,
    "expiration",
    timestamp: Timestamp
);

/// Pixel dimensions written as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (width, height) = s.split_once('x')?;
        Some(Self {
            width: canonical_number(width)?,
            height: canonical_number(height)?,
        })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl_memory_size!(Dimensions { width, height });

/// `["image", <url>, <WxH>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag {
    pub url: String,
    pub dimensions: Option<Dimensions>,
}

impl TagCodec for ImageTag {
    const NAME: &'static str = "image";

    fn parse(tag: &Tag) -> Option<Self> {
        let url = required(tag, Self::NAME, 3, 1)?;
        let dimensions = match tag.optional(2) {
            Some(dims) => Some(Dimensions::parse(dims)?),
            None => None,
        };
        Some(Self {
            url: url.to_string(),
            dimensions,
        })
    }

    fn assemble(&self) -> Tag {
        let dims = self.dimensions.map(|d| d.to_string());
        Tag::with_optional(Self::NAME, &[&self.url], &[dims.as_deref()])
    }
}

impl_memory_size!(ImageTag { url, dimensions });

/// `["content-warning", <reason>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContentWarningTag {
    pub reason: Option<String>,
}

impl TagCodec for ContentWarningTag {
    const NAME: &'static str = "content-warning";

    fn parse(tag: &Tag) -> Option<Self> {
        if !fits(tag, Self::NAME, 2) {
            return None;
        }
        Some(Self {
            reason: tag.optional(1).map(str::to_string),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::with_optional(Self::NAME, &[], &[self.reason.as_deref()])
    }
}

impl_memory_size!(ContentWarningTag { reason });

/// `["client", <name>, <handler address>?, <relay hint>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientTag {
    pub name: String,
    pub address: Option<Address>,
    pub relay: Option<String>,
}

impl ClientTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            relay: None,
        }
    }
}

impl TagCodec for ClientTag {
    const NAME: &'static str = "client";

    fn parse(tag: &Tag) -> Option<Self> {
        let name = required(tag, Self::NAME, 4, 1)?;
        let address = match tag.optional(2) {
            Some(raw) => Some(Address::parse(raw).ok()?),
            None => None,
        };
        Some(Self {
            name: name.to_string(),
            address,
            relay: tag.optional(3).map(str::to_string),
        })
    }

    fn assemble(&self) -> Tag {
        let address = self.address.as_ref().map(Address::to_string);
        Tag::with_optional(
            Self::NAME,
            &[&self.name],
            &[address.as_deref(), self.relay.as_deref()],
        )
    }
}

impl_memory_size!(ClientTag { name, address, relay });

/// `["emoji", <shortcode>, <image url>]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmojiTag {
    pub shortcode: String,
    pub url: String,
}

impl EmojiTag {
    fn valid_shortcode(s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl TagCodec for EmojiTag {
    const NAME: &'static str = "emoji";

    fn parse(tag: &Tag) -> Option<Self> {
        let shortcode = required(tag, Self::NAME, 3, 1)?;
        if !Self::valid_shortcode(shortcode) {
            return None;
        }
        Some(Self {
            shortcode: shortcode.to_string(),
            url: tag.optional(2)?.to_string(),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME, self.shortcode.as_str(), self.url.as_str()])
    }
}

impl_memory_size!(EmojiTag { shortcode, url });

/// `["nonce", <nonce>, <target difficulty>]`: proof of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonceTag {
    pub nonce: u64,
    pub difficulty: u8,
}

impl TagCodec for NonceTag {
    const NAME: &'static str = "nonce";

    fn parse(tag: &Tag) -> Option<Self> {
        let nonce = canonical_number(required(tag, Self::NAME, 3, 1)?)?;
        let difficulty = canonical_number(tag.get(2)?)?;
        Some(Self { nonce, difficulty })
    }

    fn assemble(&self) -> Tag {
        Tag::new([
            Self::NAME.to_string(),
            self.nonce.to_string(),
            self.difficulty.to_string(),
        ])
    }
}

impl_memory_size!(NonceTag { nonce, difficulty });

/// `["l", <label>, <namespace>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelTag {
    pub label: String,
    pub namespace: Option<String>,
}

impl TagCodec for LabelTag {
    const NAME: &'static str = "l";

    fn parse(tag: &Tag) -> Option<Self> {
        let label = required(tag, Self::NAME, 3, 1)?;
        Some(Self {
            label: label.to_string(),
            namespace: tag.optional(2).map(str::to_string),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::with_optional(Self::NAME, &[&self.label], &[self.namespace.as_deref()])
    }
}

impl_memory_size!(LabelTag { label, namespace });

/// `["proxy", <foreign id>, <protocol>]`: bridged content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyTag {
    pub id: String,
    pub protocol: String,
}

impl TagCodec for ProxyTag {
    const NAME: &'static str = "proxy";

    fn parse(tag: &Tag) -> Option<Self> {
        let id = required(tag, Self::NAME, 3, 1)?;
        Some(Self {
            id: id.to_string(),
            protocol: tag.optional(2)?.to_string(),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME, self.id.as_str(), self.protocol.as_str()])
    }
}

impl_memory_size!(ProxyTag { id, protocol });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert_eq!(Dimensions::parse("640x480"), Some(Dimensions::new(640, 480)));
        assert_eq!(Dimensions::parse("640X480"), None);
        assert_eq!(Dimensions::parse("640x"), None);
        assert_eq!(Dimensions::new(1, 2).to_string(), "1x2");
    }

    #[test]
    fn test_image_with_and_without_dims() {
        let plain = Tag::from(["image", "https://x/y.png"]);
        assert_eq!(ImageTag::parse(&plain).unwrap().dimensions, None);

        let sized = Tag::from(["image", "https://x/y.png", "10x20"]);
        let parsed = ImageTag::parse(&sized).unwrap();
        assert_eq!(parsed.dimensions, Some(Dimensions::new(10, 20)));
        assert_eq!(parsed.assemble(), sized);

        assert!(ImageTag::parse(&Tag::from(["image", "u", "wide"])).is_none());
    }

    #[test]
    fn test_content_warning_optional_reason() {
        let bare = Tag::from(["content-warning"]);
        assert_eq!(ContentWarningTag::parse(&bare), Some(ContentWarningTag::default()));
        assert_eq!(ContentWarningTag::default().assemble(), bare);

        let reason = Tag::from(["content-warning", "spoilers"]);
        assert_eq!(
            ContentWarningTag::parse(&reason).unwrap().reason.as_deref(),
            Some("spoilers")
        );
    }

    #[test]
    fn test_nonce_requires_both_fields() {
        let tag = Tag::from(["nonce", "776797", "20"]);
        let parsed = NonceTag::parse(&tag).unwrap();
        assert_eq!(parsed.nonce, 776797);
        assert_eq!(parsed.difficulty, 20);
        assert!(NonceTag::parse(&Tag::from(["nonce", "776797"])).is_none());
        assert!(NonceTag::parse(&Tag::from(["nonce", "1", "300"])).is_none());
    }

    #[test]
    fn test_emoji_shortcode_validation() {
        assert!(EmojiTag::parse(&Tag::from(["emoji", "soapbox", "https://e/s.png"])).is_some());
        assert!(EmojiTag::parse(&Tag::from(["emoji", "bad code", "https://e/s.png"])).is_none());
        assert!(EmojiTag::parse(&Tag::from(["emoji", "soapbox"])).is_none());
    }

    #[test]
    fn test_expiration_timestamp() {
        let tag = Tag::from(["expiration", "1700000000"]);
        assert_eq!(ExpirationTag::parse(&tag).unwrap().timestamp, 1_700_000_000);
        assert!(ExpirationTag::parse(&Tag::from(["expiration", "soon"])).is_none());
    }

    #[test]
    fn test_client_with_handler_address() {
        let address = format!("31990:{}:handler", "ab".repeat(32));
        let tag = Tag::new(["client".to_string(), "quill".into(), address, "wss://r".into()]);
        let parsed = ClientTag::parse(&tag).unwrap();
        assert_eq!(parsed.name, "quill");
        assert!(parsed.address.is_some());
        assert_eq!(parsed.assemble(), tag);
    }
}
