//! File metadata dialects (NIP-94 style) plus the audio waveform.

use crate::memory::impl_memory_size;
use crate::tag::{required, Dimensions, Tag, TagCodec};
use crate::types::decode_hex32;

text_tag!(FileUrlTag, "url", url);
text_tag!(MimeTypeTag, "m", mime_type);
text_tag!(BlurhashTag, "blurhash", blurhash);

number_tag!(
    /// `["duration", <seconds>]`
    DurationTag,
    "duration",
    seconds: u32
);

number_tag!(SizeTag, "size", bytes: u64);

/// `["waveform", "[0,12,40,...]"]`: amplitude samples for a voice note.
///
/// The field is a compact JSON array. Anything that would not re-encode to
/// the same text (spaces, negative or fractional samples) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaveformTag {
    pub amplitudes: Vec<u32>,
}

impl WaveformTag {
    pub fn new(amplitudes: Vec<u32>) -> Self {
        Self { amplitudes }
    }

    fn encode(amplitudes: &[u32]) -> String {
        serde_json::to_string(amplitudes).expect("integer arrays always serialize")
    }
}

impl TagCodec for WaveformTag {
    const NAME: &'static str = "waveform";

    fn parse(tag: &Tag) -> Option<Self> {
        let raw = required(tag, Self::NAME, 2, 1)?;
        let amplitudes: Vec<u32> = serde_json::from_str(raw).ok()?;
        (Self::encode(&amplitudes) == raw).then_some(Self { amplitudes })
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME.to_string(), Self::encode(&self.amplitudes)])
    }
}

impl_memory_size!(WaveformTag { amplitudes });

/// `["x", <sha256 hex>]`: hash of the referenced file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashTag {
    pub sha256: [u8; 32],
}

impl TagCodec for HashTag {
    const NAME: &'static str = "x";

    fn parse(tag: &Tag) -> Option<Self> {
        let sha256 = decode_hex32(required(tag, Self::NAME, 2, 1)?).ok()?;
        Some(Self { sha256 })
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME.to_string(), hex::encode(self.sha256)])
    }
}

impl crate::memory::MemorySize for HashTag {
    fn count_memory(&self) -> usize {
        crate::memory::REFERENCE_SLOT + self.sha256.len()
    }
}

/// `["dim", <WxH>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionsTag {
    pub dimensions: Dimensions,
}

impl TagCodec for DimensionsTag {
    const NAME: &'static str = "dim";

    fn parse(tag: &Tag) -> Option<Self> {
        let dimensions = Dimensions::parse(required(tag, Self::NAME, 2, 1)?)?;
        Some(Self { dimensions })
    }

    fn assemble(&self) -> Tag {
        Tag::new([Self::NAME.to_string(), self.dimensions.to_string()])
    }
}

impl_memory_size!(DimensionsTag { dimensions });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_json() {
        let tag = Tag::from(["waveform", "[0,12,40,7]"]);
        let parsed = WaveformTag::parse(&tag).unwrap();
        assert_eq!(parsed.amplitudes, vec![0, 12, 40, 7]);
        assert_eq!(parsed.assemble(), tag);

        assert_eq!(
            WaveformTag::parse(&Tag::from(["waveform", "[]"])).unwrap().amplitudes,
            Vec::<u32>::new()
        );
    }

    #[test]
    fn test_waveform_assembles_compact_json() {
        let samples = vec![0, u32::MAX, 3];
        let tag = WaveformTag::new(samples.clone()).assemble();
        assert_eq!(tag.get(1), Some(serde_json::to_string(&samples).unwrap().as_str()));
        assert_eq!(tag.get(1), Some("[0,4294967295,3]"));
        assert_eq!(WaveformTag::parse(&tag).unwrap().amplitudes, samples);
    }

    #[test]
    fn test_waveform_rejects_malformed() {
        for raw in ["not json", "[1, 2]", "[-1]", "[1.5]", "{\"a\":1}"] {
            assert!(
                WaveformTag::parse(&Tag::from(["waveform", raw])).is_none(),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_duration_integer_seconds() {
        assert_eq!(
            DurationTag::parse(&Tag::from(["duration", "42"])).unwrap().seconds,
            42
        );
        assert!(DurationTag::parse(&Tag::from(["duration", "4.2"])).is_none());
    }

    #[test]
    fn test_hash_tag() {
        let hex = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        let tag = Tag::from(["x", hex]);
        assert_eq!(HashTag::parse(&tag).unwrap().assemble(), tag);
        assert!(HashTag::parse(&Tag::from(["x", "abc"])).is_none());
    }
}
