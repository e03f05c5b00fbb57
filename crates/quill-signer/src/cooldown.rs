//! Duplicate-action suppression.
//!
//! A [`CooldownGuard`] remembers when an actor last acted on a target and
//! refuses a repeat within the window. Check and record happen under one
//! lock, so two racing callers cannot both acquire the same pair.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use quill_core::{EventId, PublicKey, Timestamp};

/// Default window for boosts: five minutes.
pub const DEFAULT_COOLDOWN_SECS: u64 = 300;

type Entries = HashMap<(PublicKey, EventId), Timestamp>;

#[derive(Debug)]
pub struct CooldownGuard {
    window_secs: u64,
    entries: Mutex<Entries>,
}

impl Default for CooldownGuard {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}

impl CooldownGuard {
    pub fn new(window_secs: u64) -> Self {
        Self {
            window_secs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cooling(&self, last: Timestamp, now: Timestamp) -> bool {
        now.saturating_sub(last) < self.window_secs
    }

    /// Record that `actor` acts on `target` at `now`.
    ///
    /// Returns `false`, recording nothing, if the pair already acted within
    /// the window. Entries whose window has passed are dropped on the way,
    /// so the guard only ever holds pairs that are still cooling.
    pub fn try_acquire(&self, actor: &PublicKey, target: &EventId, now: Timestamp) -> bool {
        let mut entries = self.lock();
        entries.retain(|_, last| self.cooling(*last, now));
        let key = (*actor, *target);
        match entries.get(&key) {
            Some(&last) if self.cooling(last, now) => false,
            _ => {
                entries.insert(key, now);
                true
            }
        }
    }

    /// Forget a recorded action so it may be retried immediately.
    pub fn release(&self, actor: &PublicKey, target: &EventId) -> bool {
        self.lock().remove(&(*actor, *target)).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drop entries whose window has passed. Returns how many were dropped.
    pub fn purge_expired(&self, now: Timestamp) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, last| self.cooling(*last, now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
