//! # Lifecycle hook slots.
//!
//! An event carries four optional hooks:
//!
//! | Kind                 | Runs                                 | Argument   |
//! |----------------------|--------------------------------------|------------|
//! | `BeforeEachCall`     | once, before the first listener      | the event  |
//! | `AfterEachCall`      | once, after the last listener        | the event  |
//! | `BeforeEachListener` | before every listener                | listener   |
//! | `AfterEachListener`  | after every listener                 | listener   |
//!
//! Each slot holds zero or one callable. Replacing or clearing a slot is
//! allowed at any time; a pass clones the `Arc` once per use, so it always
//! calls a whole hook (never a torn value).
//!
//! Hooks report failures the way listeners do, with `Err(ListenerError)`.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dispatch::event::Event;
use crate::error::ListenerError;
use crate::listeners::Listener;

/// Hook invoked with the event around a whole pass.
pub type CallHook<P> = Arc<dyn Fn(&Event<P>) -> Result<(), ListenerError> + Send + Sync>;

/// Hook invoked with the listener around each listener execution.
pub type ListenerHook<P> =
    Arc<dyn Fn(&dyn Listener<P>) -> Result<(), ListenerError> + Send + Sync>;

/// Identifies a hook in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    BeforeEachCall,
    AfterEachCall,
    BeforeEachListener,
    AfterEachListener,
}

impl HookKind {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HookKind::BeforeEachCall => "before_each_call",
            HookKind::AfterEachCall => "after_each_call",
            HookKind::BeforeEachListener => "before_each_listener",
            HookKind::AfterEachListener => "after_each_listener",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Replaceable optional hook.
pub(crate) struct HookSlot<H> {
    inner: RwLock<Option<H>>,
}

impl<H: Clone> HookSlot<H> {
    pub(crate) fn empty() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Replaces the hook (`None` clears it).
    pub(crate) fn set(&self, hook: Option<H>) {
        *self.inner.write() = hook;
    }

    /// Current hook, detached from the slot.
    pub(crate) fn get(&self) -> Option<H> {
        self.inner.read().clone()
    }

}

/// The four hook slots of one event.
pub(crate) struct Hooks<P> {
    pub(crate) before_call: HookSlot<CallHook<P>>,
    pub(crate) after_call: HookSlot<CallHook<P>>,
    pub(crate) before_listener: HookSlot<ListenerHook<P>>,
    pub(crate) after_listener: HookSlot<ListenerHook<P>>,
}

impl<P: 'static> Hooks<P> {
    pub(crate) fn new() -> Self {
        Self {
            before_call: HookSlot::empty(),
            after_call: HookSlot::empty(),
            before_listener: HookSlot::empty(),
            after_listener: HookSlot::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_slot_replace_and_clear() {
        let slot: HookSlot<Arc<dyn Fn() -> usize + Send + Sync>> = HookSlot::empty();
        assert!(slot.get().is_none());

        slot.set(Some(Arc::new(|| 1)));
        assert_eq!(slot.get().map(|h| h()), Some(1));

        slot.set(Some(Arc::new(|| 2)));
        assert_eq!(slot.get().map(|h| h()), Some(2));

        slot.set(None);
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_detached_hook_survives_replacement() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let slot: HookSlot<Arc<dyn Fn() + Send + Sync>> = HookSlot::empty();
        slot.set(Some(Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        })));

        let held = slot.get();
        slot.set(None);
        if let Some(h) = held {
            h();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_kind_labels() {
        assert_eq!(HookKind::BeforeEachCall.to_string(), "before_each_call");
        assert_eq!(HookKind::AfterEachListener.as_label(), "after_each_listener");
    }
}
