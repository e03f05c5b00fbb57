//! Addresses of replaceable-by-identifier events: `kind:pubkey:d`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crypto::PublicKey;
use crate::error::CoreError;
use crate::memory::impl_memory_size;
use crate::tag::canonical_number;
use crate::types::Kind;

/// Coordinates of an addressable event. The latest event from `pubkey`
/// with this `kind` and `d` tag is the one the address points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub kind: Kind,
    pub pubkey: PublicKey,
    pub identifier: String,
}

impl Address {
    pub fn new(kind: Kind, pubkey: PublicKey, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            pubkey,
            identifier: identifier.into(),
        }
    }

    /// Parse `kind:pubkey:identifier`. The identifier may itself contain `:`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let mut parts = s.splitn(3, ':');
        let (Some(kind), Some(pubkey), Some(identifier)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CoreError::MalformedEvent(format!("bad address: {s}")));
        };
        let kind = canonical_number::<u16>(kind)
            .ok_or_else(|| CoreError::MalformedEvent(format!("bad address kind: {kind}")))?;
        Ok(Self {
            kind: Kind(kind),
            pubkey: PublicKey::from_hex(pubkey)?,
            identifier: identifier.to_string(),
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.pubkey, self.identifier)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl_memory_size!(Address { kind, pubkey, identifier });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let raw = format!("30023:{}:my-article", "ab".repeat(32));
        let address = Address::parse(&raw).unwrap();
        assert_eq!(address.kind, Kind(30023));
        assert_eq!(address.identifier, "my-article");
        assert_eq!(address.to_string(), raw);
    }

    #[test]
    fn test_identifier_may_contain_colons() {
        let raw = format!("30617:{}:repo:with:colons", "cd".repeat(32));
        let address = Address::parse(&raw).unwrap();
        assert_eq!(address.identifier, "repo:with:colons");
    }

    #[test]
    fn test_empty_identifier_allowed() {
        let raw = format!("10003:{}:", "ef".repeat(32));
        assert_eq!(Address::parse(&raw).unwrap().identifier, "");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Address::parse("nope").is_err());
        assert!(Address::parse(&format!("01:{}:d", "ab".repeat(32))).is_err());
        assert!(Address::parse("1:xyz:d").is_err());
    }
}
