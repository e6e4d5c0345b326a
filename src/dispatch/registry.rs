//! # Listener registry - concurrent map of listeners owned by one event.
//!
//! ## Architecture
//! ```text
//! add(listener, p)  ──► DashMap<id, PrioritizedListener> ◄── remove(id)
//!                              │                         ◄── set_priority(id, p)
//!                              ▼
//!                        snapshot() ──► sorted Vec (one per pass)
//! ```
//!
//! ## Rules
//! - Keyed by listener id; re-adding an id replaces the entry (never duplicates).
//! - Mutations are internally synchronized and may race with a running pass.
//! - A pass works on its own snapshot; mutations show up in the next pass.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use dashmap::DashMap;

use crate::dispatch::ordering::{PrioritizedListener, sort_for_dispatch};
use crate::listeners::{ListenerId, ListenerRef};

/// Concurrent listener registry.
pub(crate) struct Registry<P> {
    entries: DashMap<ListenerId, PrioritizedListener<P>>,
    next_seq: AtomicU64,
}

impl<P: 'static> Registry<P> {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Stores or replaces the entry for the listener's id.
    ///
    /// Returns `true` if an entry with the same id was replaced.
    pub(crate) fn add(&self, listener: ListenerRef<P>, priority: i32) -> bool {
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::Relaxed);
        let id = listener.id().clone();
        self.entries
            .insert(id, PrioritizedListener::new(listener, priority, seq))
            .is_some()
    }

    /// Removes the entry; returns whether it was present.
    pub(crate) fn remove(&self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn priority(&self, id: &str) -> Option<i32> {
        self.entries.get(id).map(|e| e.priority)
    }

    /// Replaces the priority in place; `false` if the id is not registered.
    pub(crate) fn set_priority(&self, id: &str, priority: i32) -> bool {
        match self.entries.get_mut(id) {
            Some(mut entry) => {
                entry.priority = priority;
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Point-in-time copy of the registry in dispatch order.
    pub(crate) fn snapshot(&self) -> Vec<PrioritizedListener<P>> {
        let mut entries: Vec<PrioritizedListener<P>> =
            self.entries.iter().map(|e| e.value().clone()).collect();
        sort_for_dispatch(&mut entries);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ListenerFn;
    use std::sync::Arc;

    fn listener(id: &str) -> ListenerRef<()> {
        Arc::new(ListenerFn::new(id, |_: &()| Ok(())).unwrap())
    }

    fn order(reg: &Registry<()>) -> Vec<String> {
        reg.snapshot()
            .iter()
            .map(|e| e.listener.id().to_string())
            .collect()
    }

    #[test]
    fn test_readd_replaces() {
        let reg = Registry::new();
        assert!(!reg.add(listener("x"), 1));
        assert!(reg.add(listener("x"), 7));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.priority("x"), Some(7));
    }

    #[test]
    fn test_readd_moves_to_back_of_ties() {
        let reg = Registry::new();
        reg.add(listener("a"), 0);
        reg.add(listener("b"), 0);
        reg.add(listener("a"), 0);
        assert_eq!(order(&reg), ["b", "a"]);
    }

    #[test]
    fn test_set_priority_keeps_registration_slot() {
        let reg = Registry::new();
        reg.add(listener("a"), 1);
        reg.add(listener("b"), 5);
        assert!(reg.set_priority("a", 5));
        assert_eq!(order(&reg), ["a", "b"]);
    }

    #[test]
    fn test_set_priority_missing_is_noop() {
        let reg = Registry::new();
        reg.add(listener("a"), 1);
        assert!(!reg.set_priority("nope", 10));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.priority("nope"), None);
        assert_eq!(reg.priority("a"), Some(1));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let reg = Registry::new();
        reg.add(listener("a"), 0);
        let snap = reg.snapshot();
        reg.remove("a");
        reg.add(listener("b"), 0);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].listener.id().as_str(), "a");
        assert_eq!(order(&reg), ["b"]);
    }
}
