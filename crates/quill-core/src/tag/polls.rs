//! Zap poll dialects (kind 6969).

use crate::memory::impl_memory_size;
use crate::tag::{canonical_number, from_scaled, required, to_scaled, Tag, TagCodec};
use crate::types::Timestamp;

number_tag!(ValueMaximumTag, "value_maximum", sats: u64);
number_tag!(ValueMinimumTag, "value_minimum", sats: u64);
number_tag!(ClosedAtTag, "closed_at", timestamp: Timestamp);

/// `["poll_option", <index>, <label>]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollOptionTag {
    pub index: u32,
    pub label: String,
}

impl PollOptionTag {
    pub fn new(index: u32, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }
}

impl TagCodec for PollOptionTag {
    const NAME: &'static str = "poll_option";

    fn parse(tag: &Tag) -> Option<Self> {
        let index = canonical_number(required(tag, Self::NAME, 3, 1)?)?;
        Some(Self {
            index,
            label: tag.get(2)?.to_string(),
        })
    }

    fn assemble(&self) -> Tag {
        Tag::new([
            Self::NAME.to_string(),
            self.index.to_string(),
            self.label.clone(),
        ])
    }
}

impl_memory_size!(PollOptionTag { index, label });

/// `["consensus_threshold", <percent>]`
///
/// The fraction of votes needed is stored as a whole percentage. Assembly
/// rounds to the nearest percent and clamps to `0..=100`, so `0.4567` is
/// written as `"46"` and reads back as `0.46`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusThresholdTag {
    pub fraction: f64,
}

impl ConsensusThresholdTag {
    pub const SCALE: f64 = 100.0;
    const MAX: u64 = 100;

    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    /// The integer written on the wire.
    pub fn percent(&self) -> u64 {
        to_scaled(self.fraction, Self::SCALE, Self::MAX)
    }
}

impl TagCodec for ConsensusThresholdTag {
    const NAME: &'static str = "consensus_threshold";

    fn parse(tag: &Tag) -> Option<Self> {
        let percent: u64 = canonical_number(required(tag, Self::NAME, 2, 1)?)?;
        if percent > Self::MAX {
            return None;
        }
        Some(Self::new(from_scaled(percent, Self::SCALE)))
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME.to_string(), self.percent().to_string()])
    }
}

impl_memory_size!(ConsensusThresholdTag { fraction });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_rounds_to_nearest_percent() {
        let tag = ConsensusThresholdTag::new(0.4567).assemble();
        assert_eq!(tag.as_slice(), &["consensus_threshold", "46"]);
        let back = ConsensusThresholdTag::parse(&tag).unwrap();
        assert_eq!(back.fraction, 0.46);
    }

    #[test]
    fn test_threshold_clamps() {
        assert_eq!(ConsensusThresholdTag::new(1.5).percent(), 100);
        assert_eq!(ConsensusThresholdTag::new(-0.3).percent(), 0);
        assert_eq!(ConsensusThresholdTag::new(f64::NAN).percent(), 0);
        assert!(ConsensusThresholdTag::parse(&Tag::from(["consensus_threshold", "101"])).is_none());
    }

    #[test]
    fn test_poll_option() {
        let tag = Tag::from(["poll_option", "0", "Yes"]);
        let parsed = PollOptionTag::parse(&tag).unwrap();
        assert_eq!(parsed, PollOptionTag::new(0, "Yes"));
        assert_eq!(parsed.assemble(), tag);
        assert!(PollOptionTag::parse(&Tag::from(["poll_option", "x", "Yes"])).is_none());
        assert!(PollOptionTag::parse(&Tag::from(["poll_option", "0"])).is_none());
    }

    #[test]
    fn test_value_bounds() {
        assert_eq!(
            ValueMinimumTag::parse(&Tag::from(["value_minimum", "10"])).unwrap().sats,
            10
        );
        assert!(ValueMaximumTag::parse(&Tag::from(["value_maximum", ""])).is_none());
    }
}
