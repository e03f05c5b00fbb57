//! Per-relay queries and the `REQ` / `CLOSE` message framing.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use quill_core::memory::{MemorySize, REFERENCE_SLOT};
use quill_core::{Kind, PublicKey, Timestamp};
use tracing::debug;

use crate::filter::Filter;

/// Subscription identifier chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A filter addressed to one relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFilter {
    pub relay: String,
    pub filter: Filter,
}

impl RelayFilter {
    pub fn new(relay: impl Into<String>, filter: Filter) -> Self {
        Self {
            relay: relay.into(),
            filter,
        }
    }

    /// The filter object to send, or `None` when it can never match.
    pub fn to_wire(&self) -> Option<Value> {
        if self.filter.is_unsatisfiable() {
            return None;
        }
        serde_json::to_value(&self.filter).ok()
    }
}

impl MemorySize for RelayFilter {
    fn count_memory(&self) -> usize {
        REFERENCE_SLOT + self.relay.count_memory() + self.filter.count_memory()
    }
}

/// Per-relay lower time bounds, usually the last EOSE seen from each relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinceMap {
    bounds: HashMap<String, Timestamp>,
}

impl SinceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relay: &str) -> Option<Timestamp> {
        self.bounds.get(relay).copied()
    }

    /// Record a bound for `relay`. Bounds only move forward.
    pub fn record(&mut self, relay: impl Into<String>, timestamp: Timestamp) {
        let bound = self.bounds.entry(relay.into()).or_insert(timestamp);
        *bound = (*bound).max(timestamp);
    }

    pub fn forget(&mut self, relay: &str) -> Option<Timestamp> {
        self.bounds.remove(relay)
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// Decode a caller-supplied pubkey. `None`, `""` and malformed hex all mean
/// no key, so no query goes out.
fn required_pubkey(pubkey: Option<&str>) -> Option<PublicKey> {
    let raw = pubkey.filter(|raw| !raw.is_empty())?;
    match PublicKey::from_hex(raw) {
        Ok(pubkey) => Some(pubkey),
        Err(e) => {
            debug!(error = %e, "skipping query for malformed pubkey");
            None
        }
    }
}

fn per_relay(
    relays: &[String],
    since: &SinceMap,
    limit: Option<u64>,
    base: Filter,
) -> Vec<RelayFilter> {
    relays
        .iter()
        .map(|relay| {
            let mut filter = base.clone();
            filter.since = since.get(relay);
            filter.limit = limit;
            RelayFilter::new(relay.clone(), filter)
        })
        .collect()
}

/// Events of `kinds` authored by `pubkey`, one filter per relay.
///
/// Returns no filters at all when `pubkey` is missing or empty; an
/// unconstrained query would pull every author's events.
pub fn author_filters(
    relays: &[String],
    kinds: &[Kind],
    pubkey: Option<&str>,
    since: &SinceMap,
    limit: Option<u64>,
) -> Vec<RelayFilter> {
    let Some(author) = required_pubkey(pubkey) else {
        return Vec::new();
    };
    let base = Filter::new()
        .kinds(kinds.iter().copied())
        .authors([author]);
    per_relay(relays, since, limit, base)
}

/// Events of `kinds` that tag `pubkey` with a `p` tag, one filter per relay.
///
/// Same empty-key rule as [`author_filters`].
pub fn mention_filters(
    relays: &[String],
    kinds: &[Kind],
    pubkey: Option<&str>,
    since: &SinceMap,
    limit: Option<u64>,
) -> Vec<RelayFilter> {
    let Some(mentioned) = required_pubkey(pubkey) else {
        return Vec::new();
    };
    let base = Filter::new()
        .kinds(kinds.iter().copied())
        .pubkey_refs([mentioned]);
    per_relay(relays, since, limit, base)
}

/// Collect filters per relay, dropping any that can never match.
pub fn group_by_relay(filters: Vec<RelayFilter>) -> BTreeMap<String, Vec<Filter>> {
    let mut grouped: BTreeMap<String, Vec<Filter>> = BTreeMap::new();
    for RelayFilter { relay, filter } in filters {
        if filter.is_unsatisfiable() {
            continue;
        }
        grouped.entry(relay).or_default().push(filter);
    }
    grouped
}

/// `["REQ", <subscription id>, <filter>...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReqMessage {
    pub subscription_id: SubscriptionId,
    pub filters: Vec<Filter>,
}

impl ReqMessage {
    pub fn new(subscription_id: SubscriptionId, filters: Vec<Filter>) -> Self {
        Self {
            subscription_id,
            filters,
        }
    }

    /// Frame the request. Unsatisfiable filters are dropped; if none remain
    /// there is nothing to ask for and `None` is returned.
    pub fn to_json(&self) -> Option<String> {
        let mut frame = vec![
            Value::from("REQ"),
            Value::from(self.subscription_id.as_str()),
        ];
        frame.extend(
            self.filters
                .iter()
                .filter(|filter| !filter.is_unsatisfiable())
                .filter_map(|filter| serde_json::to_value(filter).ok()),
        );
        if frame.len() == 2 {
            return None;
        }
        serde_json::to_string(&frame).ok()
    }
}

/// `["CLOSE", <subscription id>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseMessage {
    pub subscription_id: SubscriptionId,
}

impl CloseMessage {
    pub fn new(subscription_id: SubscriptionId) -> Self {
        Self { subscription_id }
    }

    pub fn to_json(&self) -> String {
        Value::from(vec![
            Value::from("CLOSE"),
            Value::from(self.subscription_id.as_str()),
        ])
        .to_string()
    }
}
