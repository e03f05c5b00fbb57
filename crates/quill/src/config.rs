//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a [`Session`](crate::Session).
///
/// Every field has a default, so a JSON override only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// How long a boost of the same event by the same author is suppressed.
    pub boost_cooldown_secs: u64,
    /// How long a [`ChannelSigner`](quill_signer::ChannelSigner) waits for
    /// its handler.
    pub signer_timeout_ms: u64,
    /// Limit applied to relay queries built by the session.
    pub default_limit: Option<u64>,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            boost_cooldown_secs: quill_signer::DEFAULT_COOLDOWN_SECS,
            signer_timeout_ms: 30_000,
            default_limit: None,
        }
    }
}

impl QuillConfig {
    /// Load a configuration, taking defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn signer_timeout(&self) -> Duration {
        Duration::from_millis(self.signer_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuillConfig::default();
        assert_eq!(config.boost_cooldown_secs, 300);
        assert_eq!(config.signer_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_limit, None);
    }

    #[test]
    fn test_partial_override() {
        let config = QuillConfig::from_json(r#"{"default_limit": 200}"#).unwrap();
        assert_eq!(config.default_limit, Some(200));
        assert_eq!(config.boost_cooldown_secs, 300);

        assert_eq!(QuillConfig::from_json("{}").unwrap(), QuillConfig::default());
        assert!(QuillConfig::from_json(r#"{"boost_cooldown_secs": "soon"}"#).is_err());
    }
}
