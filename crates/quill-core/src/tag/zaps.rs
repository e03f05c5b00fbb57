//! Lightning zap dialects: receipts, requests, splits and fundraising goals.

use crate::crypto::PublicKey;
use crate::memory::impl_memory_size;
use crate::tag::{required, Tag, TagCodec};
use crate::types::EventId;

number_tag!(
    /// `["zapraiser", <sats>]`: fundraising target on a note.
    ZapRaiserTag,
    "zapraiser",
    sats: u64
);

number_tag!(
    /// `["amount", <millisats>]`
    AmountTag,
    "amount",
    millisats: u64
);

text_tag!(Bolt11Tag, "bolt11", invoice);
text_tag!(PreimageTag, "preimage", preimage);
text_tag!(LnurlTag, "lnurl", lnurl);

text_tag!(
    /// `["description", <zap request JSON>]`, kept as the exact string the
    /// receipt was signed over.
    DescriptionTag,
    "description",
    request
);

/// `["zap", <pubkey>, <relay hint>, <weight>?]`: one recipient of a split.
///
/// Weights are relative and written in shortest decimal form. `"1.0"` would
/// assemble back as `"1"`, so only the shortest form is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ZapSplitTag {
    pub pubkey: PublicKey,
    pub relay: Option<String>,
    pub weight: Option<f64>,
}

impl ZapSplitTag {
    pub fn new(pubkey: PublicKey, weight: f64) -> Self {
        Self {
            pubkey,
            relay: None,
            weight: Some(weight),
        }
    }
}

impl TagCodec for ZapSplitTag {
    const NAME: &'static str = "zap";

    fn parse(tag: &Tag) -> Option<Self> {
        let pubkey = PublicKey::from_hex(required(tag, Self::NAME, 4, 1)?).ok()?;
        let weight = match tag.optional(3) {
            Some(raw) => {
                let weight = raw.parse::<f64>().ok()?;
                if !weight.is_finite() || weight < 0.0 || weight.to_string() != raw {
                    return None;
                }
                Some(weight)
            }
            None => None,
        };
        Some(Self {
            pubkey,
            relay: tag.optional(2).map(str::to_string),
            weight,
        })
    }

    fn assemble(&self) -> Tag {
        let weight = self.weight.map(|w| w.to_string());
        Tag::with_optional(
            Self::NAME,
            &[&self.pubkey.to_hex()],
            &[self.relay.as_deref(), weight.as_deref()],
        )
    }
}

impl_memory_size!(ZapSplitTag { pubkey, relay, weight });

/// `["relays", <url>, <url>...]`: where a zap receipt should be published.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelaysTag {
    pub relays: Vec<String>,
}

impl TagCodec for RelaysTag {
    const NAME: &'static str = "relays";

    fn parse(tag: &Tag) -> Option<Self> {
        if !tag.is_named(Self::NAME) {
            return None;
        }
        let relays = tag.trimmed().get(1..)?.to_vec();
        if relays.is_empty() {
            return None;
        }
        Some(Self { relays })
    }

    fn assemble(&self) -> Tag {
        Tag::new(std::iter::once(Self::NAME).chain(self.relays.iter().map(String::as_str)))
    }
}

impl_memory_size!(RelaysTag { relays });

/// `["goal", <goal event id>, <relay hint>?]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoalTag {
    pub goal: EventId,
    pub relay: Option<String>,
}

impl TagCodec for GoalTag {
    const NAME: &'static str = "goal";

    fn parse(tag: &Tag) -> Option<Self> {
        let goal = EventId::from_hex(required(tag, Self::NAME, 3, 1)?).ok()?;
        Some(Self {
            goal,
            relay: tag.optional(2).map(str::to_string),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::with_optional(Self::NAME, &[&self.goal.to_hex()], &[self.relay.as_deref()])
    }
}

impl_memory_size!(GoalTag { goal, relay });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zapraiser_amount() {
        let tag = Tag::from(["zapraiser", "21000"]);
        assert_eq!(ZapRaiserTag::parse(&tag).unwrap().sats, 21_000);
        assert_eq!(ZapRaiserTag::new(21_000).assemble(), tag);
        assert!(ZapRaiserTag::parse(&Tag::from(["zapraiser", "lots"])).is_none());
        assert!(ZapRaiserTag::parse(&Tag::from(["zapraiser"])).is_none());
    }

    #[test]
    fn test_zap_split_weight() {
        let pk = "cc".repeat(32);
        let tag = Tag::new(["zap".to_string(), pk.clone(), "wss://r".into(), "1.5".into()]);
        let parsed = ZapSplitTag::parse(&tag).unwrap();
        assert_eq!(parsed.weight, Some(1.5));
        assert_eq!(parsed.assemble(), tag);

        let padded = Tag::new(["zap".to_string(), pk.clone(), String::new(), "1.0".into()]);
        assert!(ZapSplitTag::parse(&padded).is_none());

        let negative = Tag::new(["zap".to_string(), pk.clone(), String::new(), "-2".into()]);
        assert!(ZapSplitTag::parse(&negative).is_none());

        let unweighted = Tag::new(["zap".to_string(), pk]);
        assert_eq!(ZapSplitTag::parse(&unweighted).unwrap().weight, None);
    }

    #[test]
    fn test_relays_needs_at_least_one() {
        assert!(RelaysTag::parse(&Tag::from(["relays"])).is_none());
        assert!(RelaysTag::parse(&Tag::from(["relays", ""])).is_none());

        let tag = Tag::from(["relays", "wss://a", "", "wss://b"]);
        let parsed = RelaysTag::parse(&tag).unwrap();
        assert_eq!(parsed.relays.len(), 3);
        assert_eq!(parsed.assemble(), tag);
    }

    #[test]
    fn test_goal_reference() {
        let tag = Tag::new(["goal".to_string(), "ab".repeat(32)]);
        assert!(GoalTag::parse(&tag).is_some());
        assert!(GoalTag::parse(&Tag::from(["goal", "nothex"])).is_none());
    }
}
