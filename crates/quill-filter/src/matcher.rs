//! In-memory subscription matcher.
//!
//! Each open subscription holds an immutable snapshot of its filters. An
//! inbound event is verified once, then tested against every snapshot.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quill_core::Event;
use tracing::{trace, warn};

use crate::error::Result;
use crate::filter::Filter;
use crate::relay::SubscriptionId;

type Subscriptions = HashMap<SubscriptionId, Arc<[Filter]>>;

/// Routes events to the subscriptions whose filters accept them.
///
/// Safe to share between threads; readers never block each other.
#[derive(Debug, Default)]
pub struct SubscriptionMatcher {
    subscriptions: RwLock<Subscriptions>,
}

impl SubscriptionMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Subscriptions> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Subscriptions> {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Open (or replace) a subscription. Returns the filters it replaced.
    pub fn open(
        &self,
        id: SubscriptionId,
        filters: impl Into<Arc<[Filter]>>,
    ) -> Option<Arc<[Filter]>> {
        self.write().insert(id, filters.into())
    }

    /// Close a subscription, discarding its filters.
    pub fn close(&self, id: &SubscriptionId) -> bool {
        self.write().remove(id).is_some()
    }

    pub fn is_open(&self, id: &SubscriptionId) -> bool {
        self.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// The current filters of a subscription.
    pub fn snapshot(&self, id: &SubscriptionId) -> Option<Arc<[Filter]>> {
        self.read().get(id).cloned()
    }

    /// Subscriptions with at least one filter accepting `event`, sorted by id.
    ///
    /// Does not verify the event; use [`deliver`](Self::deliver) for
    /// untrusted input.
    pub fn matching(&self, event: &Event) -> Vec<SubscriptionId> {
        let mut matched: Vec<SubscriptionId> = self
            .read()
            .iter()
            .filter(|(_, filters)| filters.iter().any(|filter| filter.matches(event)))
            .map(|(id, _)| id.clone())
            .collect();
        matched.sort();
        matched
    }

    /// Verify `event` and return the subscriptions it should be delivered to.
    ///
    /// An event that fails verification is never delivered.
    pub fn deliver(&self, event: &Event) -> Result<Vec<SubscriptionId>> {
        if let Err(e) = event.verify() {
            warn!(id = %event.id(), error = %e, "dropping event that failed verification");
            return Err(e.into());
        }
        let matched = self.matching(event);
        trace!(id = %event.id(), subscriptions = matched.len(), "event matched");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use quill_core::{Keypair, Kind, Tag, UnsignedEvent};

    fn signed(kind: Kind, tags: Vec<Tag>) -> Event {
        let keypair = Keypair::from_secret_bytes(&[0x42; 32]).unwrap();
        UnsignedEvent::new(keypair.public_key(), kind, tags, "hi")
            .created_at(1_700_000_000)
            .sign_with(&keypair)
            .unwrap()
    }

    #[test]
    fn test_matching_routes_by_filter() {
        let matcher = SubscriptionMatcher::new();
        matcher.open("notes".into(), vec![Filter::new().kinds([Kind(1)])]);
        matcher.open("reactions".into(), vec![Filter::new().kinds([Kind(7)])]);
        matcher.open(
            "either".into(),
            vec![Filter::new().kinds([Kind(7)]), Filter::new().kinds([Kind(1)])],
        );

        let note = signed(Kind(1), vec![]);
        assert_eq!(
            matcher.matching(&note),
            vec![SubscriptionId::from("either"), SubscriptionId::from("notes")]
        );
    }

    #[test]
    fn test_close_discards_filters() {
        let matcher = SubscriptionMatcher::new();
        let id = SubscriptionId::from("sub");
        matcher.open(id.clone(), vec![Filter::new()]);
        assert!(matcher.is_open(&id));
        assert!(matcher.close(&id));
        assert!(!matcher.is_open(&id));
        assert!(matcher.snapshot(&id).is_none());
        assert!(matcher.matching(&signed(Kind(1), vec![])).is_empty());
        assert!(!matcher.close(&id));
    }

    #[test]
    fn test_open_replaces_snapshot() {
        let matcher = SubscriptionMatcher::new();
        let id = SubscriptionId::from("sub");
        assert!(matcher.open(id.clone(), vec![Filter::new().kinds([Kind(1)])]).is_none());
        let previous = matcher.open(id.clone(), vec![Filter::new().kinds([Kind(7)])]);
        assert_eq!(previous.unwrap()[0], Filter::new().kinds([Kind(1)]));
        assert_eq!(matcher.len(), 1);
    }

    #[test]
    fn test_deliver_rejects_tampered_event() {
        let matcher = SubscriptionMatcher::new();
        matcher.open("all".into(), vec![Filter::new()]);

        let event = signed(Kind(1), vec![]);
        let mut wire: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        wire["content"] = "tampered".into();
        let tampered = Event::from_json(&wire.to_string()).unwrap();

        assert!(matches!(
            matcher.deliver(&tampered),
            Err(FilterError::InvalidEvent(_))
        ));
        assert_eq!(matcher.deliver(&event).unwrap(), vec![SubscriptionId::from("all")]);
    }

    #[test]
    fn test_shared_across_threads() {
        let matcher = Arc::new(SubscriptionMatcher::new());
        matcher.open("notes".into(), vec![Filter::new().kinds([Kind(1)])]);
        let note = signed(Kind(1), vec![]);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let matcher = Arc::clone(&matcher);
                let note = note.clone();
                std::thread::spawn(move || matcher.deliver(&note).map(|ids| ids.len()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 1);
        }
    }
}
