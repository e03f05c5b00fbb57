//! NIP-01 subscription filters.
//!
//! A filter is a conjunction of optional constraints:
//! - Event ids
//! - Authors
//! - Event kinds
//! - Tag values (`#e`, `#p`, `#k`, ...), compared against each tag's first field
//! - Time window (`since`, `until`, both inclusive)
//! - Result limit (a relay-side cap, not part of matching)
//!
//! Every collection is a [`Values`] so that "not given" and "given empty"
//! stay distinct until serialization, where both are left out.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use quill_core::memory::{MemorySize, REFERENCE_SLOT};
use quill_core::{Event, EventId, Kind, PublicKey, Timestamp};

use crate::error::{FilterError, Result};
use crate::values::Values;

/// A subscription filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub ids: Values<EventId>,
    pub authors: Values<PublicKey>,
    pub kinds: Values<Kind>,
    /// Tag constraints keyed by tag name, without the `#` prefix.
    pub tags: BTreeMap<String, Values<String>>,
    pub since: Option<Timestamp>,
    pub until: Option<Timestamp>,
    pub limit: Option<u64>,
}

impl Filter {
    /// A filter with no constraints. It matches every event.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(mut self, ids: impl IntoIterator<Item = EventId>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    pub fn authors(mut self, authors: impl IntoIterator<Item = PublicKey>) -> Self {
        self.authors = authors.into_iter().collect();
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Constrain tag `name` (with or without a leading `#`).
    pub fn tag<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.strip_prefix('#').unwrap_or(name);
        self.tags.insert(
            name.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Events referencing any of `ids` through `e` tags.
    pub fn event_refs(self, ids: impl IntoIterator<Item = EventId>) -> Self {
        self.tag("e", ids.into_iter().map(|id| id.to_hex()))
    }

    /// Events mentioning any of `pubkeys` through `p` tags.
    pub fn pubkey_refs(self, pubkeys: impl IntoIterator<Item = PublicKey>) -> Self {
        self.tag("p", pubkeys.into_iter().map(|pk| pk.to_hex()))
    }

    pub fn since(mut self, timestamp: Timestamp) -> Self {
        self.since = Some(timestamp);
        self
    }

    pub fn until(mut self, timestamp: Timestamp) -> Self {
        self.until = Some(timestamp);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether some constraint was given as an empty set, or the time window
    /// is inverted. Such a filter can never match and must not be sent to a
    /// relay, which would read the omitted field as "anything".
    pub fn is_unsatisfiable(&self) -> bool {
        self.ids.is_unsatisfiable()
            || self.authors.is_unsatisfiable()
            || self.kinds.is_unsatisfiable()
            || self.tags.values().any(Values::is_unsatisfiable)
            || matches!((self.since, self.until), (Some(since), Some(until)) if since > until)
    }

    /// Check if an event matches this filter.
    pub fn matches(&self, event: &Event) -> bool {
        if !self.ids.contains(event.id()) {
            return false;
        }

        if !self.authors.contains(event.pubkey()) {
            return false;
        }

        if !self.kinds.contains(&event.kind()) {
            return false;
        }

        if let Some(since) = self.since {
            if event.created_at() < since {
                return false;
            }
        }

        if let Some(until) = self.until {
            if event.created_at() > until {
                return false;
            }
        }

        self.tags.iter().all(|(name, allowed)| {
            if allowed.is_absent() {
                return true;
            }
            event
                .tags_named(name)
                .filter_map(|tag| tag.value())
                .any(|value| allowed.admits(|candidate| candidate == value))
        })
    }

    /// Encode for a relay, or `None` if the filter can never match.
    pub fn to_json(&self) -> Option<String> {
        if self.is_unsatisfiable() {
            return None;
        }
        serde_json::to_string(self).ok()
    }

    /// Decode a relay filter object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(ids) = self.ids.as_slice() {
            map.serialize_entry("ids", ids)?;
        }
        if let Some(authors) = self.authors.as_slice() {
            map.serialize_entry("authors", authors)?;
        }
        if let Some(kinds) = self.kinds.as_slice() {
            map.serialize_entry("kinds", kinds)?;
        }
        for (name, values) in &self.tags {
            if let Some(values) = values.as_slice() {
                map.serialize_entry(&format!("#{name}"), values)?;
            }
        }
        if let Some(since) = self.since {
            map.serialize_entry("since", &since)?;
        }
        if let Some(until) = self.until {
            map.serialize_entry("until", &until)?;
        }
        if let Some(limit) = self.limit {
            map.serialize_entry("limit", &limit)?;
        }
        map.end()
    }
}

/// Missing or `null` is absent, `[]` is empty.
fn decode_values<T>(field: &str, value: Value) -> std::result::Result<Values<T>, FilterError>
where
    T: serde::de::DeserializeOwned,
{
    match value {
        Value::Null => Ok(Values::Absent),
        Value::Array(items) if items.is_empty() => Ok(Values::Empty),
        other => serde_json::from_value::<Vec<T>>(other)
            .map(Values::Populated)
            .map_err(|e| FilterError::InvalidFilter(format!("{field}: {e}"))),
    }
}

fn decode_number(field: &str, value: Value) -> std::result::Result<Option<u64>, FilterError> {
    match value {
        Value::Null => Ok(None),
        other => serde_json::from_value::<u64>(other)
            .map(Some)
            .map_err(|e| FilterError::InvalidFilter(format!("{field}: {e}"))),
    }
}

impl TryFrom<Map<String, Value>> for Filter {
    type Error = FilterError;

    fn try_from(object: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let mut filter = Filter::new();
        for (key, value) in object {
            match key.as_str() {
                "ids" => filter.ids = decode_values("ids", value)?,
                "authors" => filter.authors = decode_values("authors", value)?,
                "kinds" => filter.kinds = decode_values("kinds", value)?,
                "since" => filter.since = decode_number("since", value)?,
                "until" => filter.until = decode_number("until", value)?,
                "limit" => filter.limit = decode_number("limit", value)?,
                _ => {
                    if let Some(name) = key.strip_prefix('#') {
                        let values = decode_values(&key, value)?;
                        filter.tags.insert(name.to_string(), values);
                    }
                    // Unknown fields (e.g. `search`) are ignored.
                }
            }
        }
        Ok(filter)
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Filter::try_from(object).map_err(de::Error::custom)
    }
}

impl MemorySize for Filter {
    fn count_memory(&self) -> usize {
        let tags: usize = self
            .tags
            .iter()
            .map(|(name, values)| REFERENCE_SLOT + name.count_memory() + values.count_memory())
            .sum();
        REFERENCE_SLOT
            + self.ids.count_memory()
            + self.authors.count_memory()
            + self.kinds.count_memory()
            + tags
            + self.since.count_memory()
            + self.until.count_memory()
            + self.limit.count_memory()
    }
}
