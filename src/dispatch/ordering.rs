//! # Priority ordering of registered listeners.
//!
//! Every registry entry is a [`PrioritizedListener`]: the listener, its
//! priority and the registration sequence number it was stored with.
//!
//! ## Ordering rule
//! - Higher priority runs first (descending, unbounded `i32`, default `0`).
//! - Equal priorities run in registration order (lower `seq` first).
//!
//! The sequence number is assigned when a listener id is (re-)added; changing
//! only the priority keeps it, so a priority update never reshuffles
//! equal-priority neighbours beyond what the new priority implies.

use std::cmp::{Ordering, Reverse};

use crate::listeners::ListenerRef;

/// Default listener priority.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Registry entry: listener plus its ordering keys.
pub(crate) struct PrioritizedListener<P> {
    pub(crate) listener: ListenerRef<P>,
    pub(crate) priority: i32,
    pub(crate) seq: u64,
}

impl<P: 'static> PrioritizedListener<P> {
    pub(crate) fn new(listener: ListenerRef<P>, priority: i32, seq: u64) -> Self {
        Self {
            listener,
            priority,
            seq,
        }
    }

    #[inline]
    fn sort_key(&self) -> (Reverse<i32>, u64) {
        (Reverse(self.priority), self.seq)
    }
}

impl<P: 'static> Clone for PrioritizedListener<P> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
            priority: self.priority,
            seq: self.seq,
        }
    }
}

/// Dispatch-order comparison: priority descending, then registration order.
#[inline]
pub(crate) fn dispatch_order<P: 'static>(a: &PrioritizedListener<P>, b: &PrioritizedListener<P>) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// Sorts a snapshot into dispatch order.
pub(crate) fn sort_for_dispatch<P: 'static>(entries: &mut [PrioritizedListener<P>]) {
    // seq is unique per registry, so the key is total and unstable sort is deterministic
    entries.sort_unstable_by(dispatch_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ListenerFn;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn entry(id: &str, priority: i32, seq: u64) -> PrioritizedListener<()> {
        let l: ListenerRef<()> = Arc::new(ListenerFn::new(id, |_: &()| Ok(())).unwrap());
        PrioritizedListener::new(l, priority, seq)
    }

    fn ids(entries: &[PrioritizedListener<()>]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.listener.id().to_string())
            .collect()
    }

    #[test]
    fn test_higher_priority_first() {
        let mut v = vec![entry("a", 5, 0), entry("b", 10, 1), entry("c", 1, 2)];
        sort_for_dispatch(&mut v);
        assert_eq!(ids(&v), ["b", "a", "c"]);
    }

    #[test]
    fn test_ties_follow_registration_order() {
        let mut v = vec![entry("late", 3, 9), entry("early", 3, 2), entry("mid", 3, 5)];
        sort_for_dispatch(&mut v);
        assert_eq!(ids(&v), ["early", "mid", "late"]);
    }

    #[test]
    fn test_negative_and_extreme_priorities() {
        let mut v = vec![
            entry("min", i32::MIN, 0),
            entry("zero", DEFAULT_PRIORITY, 1),
            entry("max", i32::MAX, 2),
            entry("neg", -1, 3),
        ];
        sort_for_dispatch(&mut v);
        assert_eq!(ids(&v), ["max", "zero", "neg", "min"]);
    }

    proptest! {
        #[test]
        fn prop_sorted_snapshot_respects_priority_then_seq(
            priorities in proptest::collection::vec(-5i32..5, 0..40)
        ) {
            let mut v: Vec<_> = priorities
                .iter()
                .enumerate()
                .map(|(i, p)| entry(&format!("l{i}"), *p, i as u64))
                .collect();
            sort_for_dispatch(&mut v);

            for pair in v.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.priority >= b.priority);
                if a.priority == b.priority {
                    prop_assert!(a.seq < b.seq);
                }
            }
            prop_assert_eq!(v.len(), priorities.len());
        }
    }
}
