//! Strong type definitions for Quill.
//!
//! Identifiers are newtypes so an event id can never be passed where a
//! public key is expected. On the wire both are lowercase hex.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A 32-byte event identifier: sha256 over the canonical serialization.
///
/// Two events with the same (pubkey, created_at, kind, tags, content) have
/// the same EventId.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    /// Create a new EventId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from lowercase hex. Uppercase is rejected so that re-encoding
    /// always reproduces the input.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        decode_hex32(s).map(Self)
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EventId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for EventId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for EventId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Event kind: the integer discriminator selecting content semantics and
/// applicable tag dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(pub u16);

impl Kind {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Kind {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Current time in Unix seconds.
pub fn now_secs() -> Timestamp {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Decode a 64-character lowercase hex string into 32 bytes.
pub(crate) fn decode_hex32(s: &str) -> Result<[u8; 32], CoreError> {
    decode_lower_hex::<32>(s)
}

/// Decode a lowercase hex string of exactly `N` bytes.
pub(crate) fn decode_lower_hex<const N: usize>(s: &str) -> Result<[u8; N], CoreError> {
    if s.len() != N * 2 {
        return Err(CoreError::InvalidHex(format!(
            "expected {} hex chars, got {}",
            N * 2,
            s.len()
        )));
    }
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(CoreError::InvalidHex("hex must be lowercase".into()));
    }
    let mut arr = [0u8; N];
    hex::decode_to_slice(s, &mut arr).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_hex_roundtrip() {
        let id = EventId::from_bytes([0x42; 32]);
        let hex = id.to_hex();
        let recovered = EventId::from_hex(&hex).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_event_id_rejects_uppercase_and_short() {
        assert!(EventId::from_hex(&"AB".repeat(32)).is_err());
        assert!(EventId::from_hex("abcd").is_err());
        assert!(EventId::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_event_id_debug() {
        let id = EventId::from_bytes([0xcd; 32]);
        let debug = format!("{:?}", id);
        assert_eq!(debug, "EventId(cdcdcdcdcdcdcdcd)");
    }

    #[test]
    fn test_event_id_serde_as_hex() {
        let id = EventId::from_bytes([0xab; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_kind_is_transparent_number() {
        assert_eq!(serde_json::to_string(&Kind(30023)).unwrap(), "30023");
    }
}
