//! # EventManager - registry of event groups.
//!
//! The manager maps group names to [`EventGroup`]s and routes dispatch
//! through them. It is an ordinary value: create as many as needed and share
//! them with `Arc`.
//!
//! ## Built-in groups
//! ```text
//! "default"  plain       register_event / call_default
//! "system"   protected   events can never be removed
//! "temp"     ephemeral   event is dropped after a managed call
//! ```
//!
//! ## Move
//! ```text
//! move_to_group(from, to, name)
//!   ├─► to.add_or_update(event)
//!   └─► from.remove(name) ── failure ─► undo insert into `to`, return error
//! ```
//! The move is best effort: concurrent callers can observe the event in both
//! groups between the two steps.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::dispatch::{CallReport, Event};
use crate::error::EventError;
use crate::groups::group::EventGroup;

/// Name of the group used by [`EventManager::register_event`].
pub const DEFAULT_GROUP: &str = "default";
/// Protected built-in group.
pub const SYSTEM_GROUP: &str = "system";
/// Ephemeral built-in group.
pub const TEMP_GROUP: &str = "temp";

/// Registry of named event groups.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use eventvisor::{Event, EventManager, ListenerFn, ListenerError};
///
/// let manager: EventManager<u32> = EventManager::new();
/// let ev = Arc::new(Event::new("tick").unwrap());
/// ev.add_listener(ListenerFn::arc("count", |_: &u32| Ok::<_, ListenerError>(())).unwrap());
///
/// manager.register_event(ev).unwrap();
/// let report = manager.call_default("tick", &1).unwrap();
/// assert_eq!(report.executed, 1);
/// ```
pub struct EventManager<P> {
    groups: RwLock<HashMap<String, Arc<EventGroup<P>>>>,
}

impl<P: 'static> EventManager<P> {
    /// Creates a manager holding the built-in groups.
    pub fn new() -> Self {
        let mut groups = HashMap::new();
        for group in [
            EventGroup::new_unchecked(DEFAULT_GROUP, false, false),
            EventGroup::new_unchecked(SYSTEM_GROUP, true, false),
            EventGroup::new_unchecked(TEMP_GROUP, false, true),
        ] {
            groups.insert(group.name().to_string(), Arc::new(group));
        }
        Self {
            groups: RwLock::new(groups),
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers `event` in the default group.
    pub fn register_event(&self, event: Arc<Event<P>>) -> Result<(), EventError> {
        self.register_event_in(DEFAULT_GROUP, event)
    }

    /// Registers `event` in `group`, creating a plain group if it is missing.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if `group` is blank.
    pub fn register_event_in(&self, group: &str, event: Arc<Event<P>>) -> Result<(), EventError> {
        let group = self.group_or_create(group)?;
        group.add_or_update(event)
    }

    /// Adds a custom group; an existing group with the same name wins.
    ///
    /// Returns the group actually registered under that name.
    pub fn register_group(&self, group: EventGroup<P>) -> Arc<EventGroup<P>> {
        let mut groups = self.groups.write();
        let registered = groups
            .entry(group.name().to_string())
            .or_insert_with(|| Arc::new(group));
        Arc::clone(registered)
    }

    fn group_or_create(&self, name: &str) -> Result<Arc<EventGroup<P>>, EventError> {
        if let Some(group) = self.find_group(name) {
            return Ok(group);
        }
        let created = EventGroup::new(name)?;
        debug!(group = %name, "group created on demand");
        Ok(self.register_group(created))
    }

    /// Removes the event `name` from the default group.
    pub fn unregister_event(&self, name: &str) -> Result<Arc<Event<P>>, EventError> {
        self.unregister_event_from(DEFAULT_GROUP, name)
    }

    /// Removes the event `name` from `group`.
    ///
    /// # Errors
    /// - [`EventError::Config`] for blank names
    /// - [`EventError::GroupNotFound`], [`EventError::ProtectedGroup`],
    ///   [`EventError::EventNotFound`]
    pub fn unregister_event_from(&self, group: &str, name: &str) -> Result<Arc<Event<P>>, EventError> {
        require_name(group, "group")?;
        require_name(name, "event")?;
        self.get_group(group)?.remove(name)
    }

    // ---------------------------
    // Lookup
    // ---------------------------

    /// Looks up `name` in the default group.
    pub fn get_event(&self, name: &str) -> Option<Arc<Event<P>>> {
        self.get_event_in(DEFAULT_GROUP, name)
    }

    pub fn get_event_in(&self, group: &str, name: &str) -> Option<Arc<Event<P>>> {
        self.find_group(group)?.get_event(name)
    }

    /// # Errors
    /// Returns [`EventError::GroupNotFound`] if no such group exists.
    pub fn get_group(&self, name: &str) -> Result<Arc<EventGroup<P>>, EventError> {
        self.find_group(name).ok_or_else(|| EventError::GroupNotFound {
            group: name.to_string(),
        })
    }

    pub fn find_group(&self, name: &str) -> Option<Arc<EventGroup<P>>> {
        self.groups.read().get(name).cloned()
    }

    pub fn group_exists(&self, name: &str) -> bool {
        self.groups.read().contains_key(name)
    }

    /// Sorted group names.
    pub fn list_groups(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    // ---------------------------
    // Move
    // ---------------------------

    /// Moves event `name` from group `from` to group `to`.
    ///
    /// # Errors
    /// - [`EventError::GroupNotFound`] if either group is missing
    /// - [`EventError::EventNotFound`] if `from` does not hold the event
    /// - [`EventError::ProtectedGroup`] if `from` is protected (nothing changes)
    pub fn move_to_group(&self, from: &str, to: &str, name: &str) -> Result<(), EventError> {
        let source = self.get_group(from)?;
        let target = self.get_group(to)?;
        let event = source.get_event(name).ok_or_else(|| EventError::EventNotFound {
            event: name.to_string(),
            group: from.to_string(),
        })?;
        if Arc::ptr_eq(&source, &target) {
            return Ok(());
        }

        let previous = target.get_event(name);
        target.add_or_update(Arc::clone(&event))?;

        if let Err(err) = source.remove(name) {
            match previous {
                Some(prev) => {
                    if !Arc::ptr_eq(&prev, &event) {
                        target.add_or_update(prev)?;
                    }
                }
                None => {
                    target.discard(&event);
                }
            }
            warn!(event = %name, from = %from, to = %to, error = %err, "group move rolled back");
            return Err(err);
        }

        debug!(event = %name, from = %from, to = %to, "event moved");
        Ok(())
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Dispatches event `name` of `group` with `payload`.
    ///
    /// Events of an ephemeral group are removed from it once the pass returns,
    /// whether it succeeded or not.
    pub fn call(&self, group: &str, name: &str, payload: &P) -> Result<CallReport, EventError> {
        let group = self.get_group(group)?;
        let event = group.get_event(name).ok_or_else(|| EventError::EventNotFound {
            event: name.to_string(),
            group: group.name().to_string(),
        })?;

        let result = event.call(payload);
        // an event re-registered under this name during the pass stays
        if group.is_ephemeral() && group.discard(&event) {
            debug!(group = %group.name(), event = %name, "ephemeral event dropped after call");
        }
        result
    }

    /// Dispatches event `name` of the default group.
    pub fn call_default(&self, name: &str, payload: &P) -> Result<CallReport, EventError> {
        self.call(DEFAULT_GROUP, name, payload)
    }
}

impl<P: 'static> Default for EventManager<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn require_name(value: &str, what: &str) -> Result<(), EventError> {
    if value.trim().is_empty() {
        return Err(EventError::config(format!("{what} name cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::listeners::ListenerFn;

    fn counted(name: &str, hits: &Arc<AtomicUsize>) -> Arc<Event<()>> {
        let ev = Arc::new(Event::new(name).unwrap());
        let hits = Arc::clone(hits);
        ev.add_listener(
            ListenerFn::arc("count", move |_: &()| {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap(),
        );
        ev
    }

    fn plain(name: &str) -> Arc<Event<()>> {
        Arc::new(Event::new(name).unwrap())
    }

    #[test]
    fn test_builtin_groups() {
        let m: EventManager<()> = EventManager::new();
        assert_eq!(m.list_groups(), ["default", "system", "temp"]);
        assert!(m.get_group(SYSTEM_GROUP).unwrap().is_protected());
        assert!(m.get_group(TEMP_GROUP).unwrap().is_ephemeral());
        assert!(!m.get_group(DEFAULT_GROUP).unwrap().is_protected());
    }

    #[test]
    fn test_managers_are_independent() {
        let a: EventManager<()> = EventManager::new();
        let b: EventManager<()> = EventManager::new();
        a.register_event(plain("only-in-a")).unwrap();

        assert!(a.get_event("only-in-a").is_some());
        assert!(b.get_event("only-in-a").is_none());
    }

    #[test]
    fn test_register_in_new_group_creates_it() {
        let m = EventManager::new();
        let ev = plain("e");
        m.register_event_in("custom", Arc::clone(&ev)).unwrap();

        assert!(m.group_exists("custom"));
        assert!(m.get_event_in("custom", "e").is_some());
        assert_eq!(ev.group_names(), ["custom"]);
    }

    #[test]
    fn test_blank_group_name_is_config_error() {
        let m = EventManager::new();
        let err = m.register_event_in(" ", plain("e")).unwrap_err();
        assert_eq!(err.as_label(), "config_invalid");
        assert_eq!(
            m.unregister_event_from("", "e").unwrap_err().as_label(),
            "config_invalid"
        );
    }

    #[test]
    fn test_register_group_keeps_existing() {
        let m: EventManager<()> = EventManager::new();
        let g = m.register_group(EventGroup::new(SYSTEM_GROUP).unwrap());
        assert!(g.is_protected());
    }

    #[test]
    fn test_unregister_errors() {
        let m: EventManager<()> = EventManager::new();
        m.register_event_in(SYSTEM_GROUP, plain("boot")).unwrap();

        assert_eq!(
            m.unregister_event_from("nope", "boot").unwrap_err().as_label(),
            "group_not_found"
        );
        assert_eq!(
            m.unregister_event_from(SYSTEM_GROUP, "boot").unwrap_err().as_label(),
            "group_protected"
        );
        assert_eq!(
            m.unregister_event("ghost").unwrap_err().as_label(),
            "event_not_found"
        );
    }

    #[test]
    fn test_unregister_returns_event() {
        let m = EventManager::new();
        let ev = plain("e");
        m.register_event(Arc::clone(&ev)).unwrap();

        let removed = m.unregister_event("e").unwrap();
        assert!(Arc::ptr_eq(&removed, &ev));
        assert!(m.get_event("e").is_none());
        assert!(ev.group_names().is_empty());
    }

    #[test]
    fn test_move_between_groups() {
        let m = EventManager::new();
        let ev = plain("e");
        m.register_event(Arc::clone(&ev)).unwrap();
        m.register_group(EventGroup::new("audit").unwrap());

        m.move_to_group(DEFAULT_GROUP, "audit", "e").unwrap();

        assert!(m.get_event("e").is_none());
        assert!(m.get_event_in("audit", "e").is_some());
        assert_eq!(ev.group_names(), ["audit"]);
    }

    #[test]
    fn test_move_out_of_protected_group_rolls_back() {
        let m = EventManager::new();
        let ev = plain("boot");
        m.register_event_in(SYSTEM_GROUP, Arc::clone(&ev)).unwrap();

        let err = m.move_to_group(SYSTEM_GROUP, DEFAULT_GROUP, "boot").unwrap_err();

        assert_eq!(err.as_label(), "group_protected");
        assert!(m.get_event("boot").is_none());
        assert!(m.get_event_in(SYSTEM_GROUP, "boot").is_some());
        assert_eq!(ev.group_names(), ["system"]);
    }

    #[test]
    fn test_move_rollback_restores_previous_target_event() {
        let m = EventManager::new();
        let protected_copy = plain("boot");
        let default_copy = plain("boot");
        m.register_event_in(SYSTEM_GROUP, Arc::clone(&protected_copy)).unwrap();
        m.register_event(Arc::clone(&default_copy)).unwrap();

        assert!(m.move_to_group(SYSTEM_GROUP, DEFAULT_GROUP, "boot").is_err());

        let kept = m.get_event("boot").unwrap();
        assert!(Arc::ptr_eq(&kept, &default_copy));
        assert_eq!(default_copy.group_names(), ["default"]);
        assert_eq!(protected_copy.group_names(), ["system"]);
    }

    #[test]
    fn test_move_missing_group_or_event() {
        let m: EventManager<()> = EventManager::new();
        assert_eq!(
            m.move_to_group("nope", DEFAULT_GROUP, "e").unwrap_err().as_label(),
            "group_not_found"
        );
        assert_eq!(
            m.move_to_group(DEFAULT_GROUP, TEMP_GROUP, "e").unwrap_err().as_label(),
            "event_not_found"
        );
    }

    #[test]
    fn test_call_default() {
        let m = EventManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        m.register_event(counted("e", &hits)).unwrap();

        m.call_default("e", &()).unwrap();
        m.call_default("e", &()).unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(m.get_event("e").is_some());
    }

    #[test]
    fn test_temp_event_dropped_after_call() {
        let m = EventManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let ev = counted("once", &hits);
        m.register_event_in(TEMP_GROUP, Arc::clone(&ev)).unwrap();

        let report = m.call(TEMP_GROUP, "once", &()).unwrap();
        assert_eq!(report.executed, 1);
        assert!(m.get_event_in(TEMP_GROUP, "once").is_none());
        assert!(ev.group_names().is_empty());

        let err = m.call(TEMP_GROUP, "once", &()).unwrap_err();
        assert_eq!(err.as_label(), "event_not_found");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_call_unknown_group() {
        let m: EventManager<()> = EventManager::new();
        assert_eq!(
            m.call("nope", "e", &()).unwrap_err().as_label(),
            "group_not_found"
        );
    }

    #[test]
    fn test_temp_reregistration_during_call_survives() {
        let m: Arc<EventManager<()>> = Arc::new(EventManager::new());
        let replacement = plain("once");
        let ev = plain("once");

        let mgr = Arc::downgrade(&m);
        let fresh = Arc::clone(&replacement);
        ev.add_listener(
            ListenerFn::arc("reregister", move |_: &()| {
                if let Some(m) = mgr.upgrade() {
                    m.register_event_in(TEMP_GROUP, Arc::clone(&fresh))
                        .map_err(|e| crate::ListenerError::fail(e.to_string()))?;
                }
                Ok(())
            })
            .unwrap(),
        );
        m.register_event_in(TEMP_GROUP, Arc::clone(&ev)).unwrap();

        m.call(TEMP_GROUP, "once", &()).unwrap();

        let kept = m.get_event_in(TEMP_GROUP, "once").unwrap();
        assert!(Arc::ptr_eq(&kept, &replacement));
        assert_eq!(replacement.group_names(), ["temp"]);
        assert!(ev.group_names().is_empty());
    }
}
