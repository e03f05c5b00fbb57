//! Well-known event kinds and NIP-01 storage classes.

use crate::types::Kind;

/// How relays retain events of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindClass {
    /// Every event is stored.
    Regular,
    /// Only the latest event per (pubkey, kind) is kept.
    Replaceable,
    /// Forwarded to live subscribers, never stored.
    Ephemeral,
    /// Only the latest event per (pubkey, kind, `d` tag) is kept.
    Addressable,
}

impl Kind {
    pub const METADATA: Kind = Kind(0);
    pub const TEXT_NOTE: Kind = Kind(1);
    pub const CONTACTS: Kind = Kind(3);
    pub const DELETION: Kind = Kind(5);
    pub const REPOST: Kind = Kind(6);
    pub const REACTION: Kind = Kind(7);
    pub const GENERIC_REPOST: Kind = Kind(16);
    pub const VOICE_NOTE: Kind = Kind(1222);
    pub const GIT_ISSUE: Kind = Kind(1621);
    pub const ZAP_POLL: Kind = Kind(6969);
    pub const ZAP_REQUEST: Kind = Kind(9734);
    pub const ZAP_RECEIPT: Kind = Kind(9735);
    pub const RELAY_LIST: Kind = Kind(10002);
    pub const BOOKMARK_LIST: Kind = Kind(10003);
    pub const AUTH: Kind = Kind(22242);
    pub const REMOTE_SIGNING: Kind = Kind(24133);
    pub const LONG_FORM: Kind = Kind(30023);
    pub const GIT_REPOSITORY: Kind = Kind(30617);

    pub const fn class(self) -> KindClass {
        match self.0 {
            0 | 3 | 10_000..=19_999 => KindClass::Replaceable,
            20_000..=29_999 => KindClass::Ephemeral,
            30_000..=39_999 => KindClass::Addressable,
            _ => KindClass::Regular,
        }
    }

    pub const fn is_regular(self) -> bool {
        matches!(self.class(), KindClass::Regular)
    }

    pub const fn is_replaceable(self) -> bool {
        matches!(self.class(), KindClass::Replaceable)
    }

    pub const fn is_ephemeral(self) -> bool {
        matches!(self.class(), KindClass::Ephemeral)
    }

    pub const fn is_addressable(self) -> bool {
        matches!(self.class(), KindClass::Addressable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(Kind::TEXT_NOTE.class(), KindClass::Regular);
        assert_eq!(Kind::ZAP_POLL.class(), KindClass::Regular);
        assert_eq!(Kind::METADATA.class(), KindClass::Replaceable);
        assert_eq!(Kind::CONTACTS.class(), KindClass::Replaceable);
        assert_eq!(Kind::BOOKMARK_LIST.class(), KindClass::Replaceable);
        assert_eq!(Kind::AUTH.class(), KindClass::Ephemeral);
        assert_eq!(Kind::REMOTE_SIGNING.class(), KindClass::Ephemeral);
        assert_eq!(Kind::LONG_FORM.class(), KindClass::Addressable);
        assert_eq!(Kind(40_000).class(), KindClass::Regular);
    }

    #[test]
    fn test_predicates_agree_with_class() {
        assert!(Kind::GIT_REPOSITORY.is_addressable());
        assert!(!Kind::GIT_ISSUE.is_addressable());
        assert!(Kind::RELAY_LIST.is_replaceable());
        assert!(Kind::AUTH.is_ephemeral());
        assert!(Kind::REACTION.is_regular());
    }
}
