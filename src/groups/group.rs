//! # EventGroup - named collection of events.
//!
//! A group owns a map `event name → Arc<Event>` and writes its own name into
//! every event it stores, so an event can answer which groups it lives in.
//!
//! ## Kinds
//! - plain: events can be added and removed freely
//! - protected: events can be added but never removed
//! - ephemeral: the manager drops an event from the group once it has been
//!   dispatched through it

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::dispatch::Event;
use crate::error::EventError;

/// Named collection of events.
pub struct EventGroup<P> {
    name: Arc<str>,
    protected: bool,
    ephemeral: bool,
    events: DashMap<String, Arc<Event<P>>>,
}

impl<P: 'static> EventGroup<P> {
    /// Creates a plain group.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if `name` is empty or only whitespace.
    pub fn new(name: impl Into<Arc<str>>) -> Result<Self, EventError> {
        Self::build(name.into(), false, false)
    }

    /// Creates a group whose events cannot be removed.
    pub fn protected(name: impl Into<Arc<str>>) -> Result<Self, EventError> {
        Self::build(name.into(), true, false)
    }

    /// Creates a group whose events are dropped after one managed dispatch.
    pub fn ephemeral(name: impl Into<Arc<str>>) -> Result<Self, EventError> {
        Self::build(name.into(), false, true)
    }

    fn build(name: Arc<str>, protected: bool, ephemeral: bool) -> Result<Self, EventError> {
        if name.trim().is_empty() {
            return Err(EventError::config("group name cannot be empty"));
        }
        Ok(Self::new_unchecked(name, protected, ephemeral))
    }

    /// Caller guarantees a non-blank name (built-in groups).
    pub(crate) fn new_unchecked(name: impl Into<Arc<str>>, protected: bool, ephemeral: bool) -> Self {
        Self {
            name: name.into(),
            protected,
            ephemeral,
            events: DashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    #[inline]
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Stores `event` under its name (replacing any event with that name) and
    /// marks it as a member of this group.
    pub(crate) fn add_or_update(&self, event: Arc<Event<P>>) -> Result<(), EventError> {
        event.set_group_name(&self.name)?;
        let name = event.name().to_string();
        let replaced = self
            .events
            .insert(name, Arc::clone(&event))
            .filter(|old| !Arc::ptr_eq(old, &event));
        if let Some(old) = replaced {
            old.remove_group(&self.name);
        }
        debug!(group = %self.name, event = %event.name(), "event added to group");
        Ok(())
    }

    /// Removes the event named `event_name` and clears its membership marker.
    ///
    /// # Errors
    /// - [`EventError::ProtectedGroup`] if this group is protected
    /// - [`EventError::EventNotFound`] if no such event is stored
    pub(crate) fn remove(&self, event_name: &str) -> Result<Arc<Event<P>>, EventError> {
        if self.protected {
            return Err(EventError::ProtectedGroup {
                group: self.name.to_string(),
            });
        }
        let (_, event) = self
            .events
            .remove(event_name)
            .ok_or_else(|| EventError::EventNotFound {
                event: event_name.to_string(),
                group: self.name.to_string(),
            })?;
        event.remove_group(&self.name);
        debug!(group = %self.name, event = %event_name, "event removed from group");
        Ok(event)
    }

    /// Drops `event` if it is still the instance stored under its name;
    /// ignores protection. Returns whether it was removed.
    pub(crate) fn discard(&self, event: &Arc<Event<P>>) -> bool {
        let removed = self
            .events
            .remove_if(event.name(), |_, stored| Arc::ptr_eq(stored, event))
            .is_some();
        if removed {
            event.remove_group(&self.name);
        }
        removed
    }

    pub fn get_event(&self, name: &str) -> Option<Arc<Event<P>>> {
        self.events.get(name).map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Sorted names of the stored events.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<P: 'static> fmt::Debug for EventGroup<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGroup")
            .field("name", &self.name)
            .field("protected", &self.protected)
            .field("ephemeral", &self.ephemeral)
            .field("events", &self.event_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> Arc<Event<()>> {
        Arc::new(Event::new(name).unwrap())
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(EventGroup::<()>::new("").is_err());
        assert!(EventGroup::<()>::protected("  ").is_err());
    }

    #[test]
    fn test_add_marks_event() {
        let g = EventGroup::new("audit").unwrap();
        let ev = event("login");
        g.add_or_update(Arc::clone(&ev)).unwrap();

        assert_eq!(ev.group_names(), ["audit"]);
        assert!(g.contains("login"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_replacing_event_unmarks_old_instance() {
        let g = EventGroup::new("audit").unwrap();
        let first = event("login");
        let second = event("login");
        g.add_or_update(Arc::clone(&first)).unwrap();
        g.add_or_update(Arc::clone(&second)).unwrap();

        assert!(first.group_names().is_empty());
        assert_eq!(second.group_names(), ["audit"]);
        assert!(Arc::ptr_eq(&g.get_event("login").unwrap(), &second));
    }

    #[test]
    fn test_remove_clears_marker() {
        let g = EventGroup::new("audit").unwrap();
        let ev = event("login");
        g.add_or_update(Arc::clone(&ev)).unwrap();

        let removed = g.remove("login").unwrap();
        assert!(Arc::ptr_eq(&removed, &ev));
        assert!(ev.group_names().is_empty());
        assert!(g.is_empty());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let g = EventGroup::<()>::new("audit").unwrap();
        let err = g.remove("ghost").unwrap_err();
        assert!(matches!(
            err,
            EventError::EventNotFound { ref event, ref group } if event == "ghost" && group == "audit"
        ));
    }

    #[test]
    fn test_protected_group_refuses_removal() {
        let g = EventGroup::protected("system").unwrap();
        g.add_or_update(event("boot")).unwrap();

        let err = g.remove("boot").unwrap_err();
        assert_eq!(err.as_label(), "group_protected");
        assert!(g.contains("boot"));
    }

    #[test]
    fn test_event_names_sorted() {
        let g = EventGroup::new("g").unwrap();
        for n in ["c", "a", "b"] {
            g.add_or_update(event(n)).unwrap();
        }
        assert_eq!(g.event_names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_discard_only_removes_same_instance() {
        let g = EventGroup::new("temp").unwrap();
        let dispatched = event("once");
        let newer = event("once");
        g.add_or_update(Arc::clone(&dispatched)).unwrap();
        g.add_or_update(Arc::clone(&newer)).unwrap();

        assert!(!g.discard(&dispatched));
        assert!(Arc::ptr_eq(&g.get_event("once").unwrap(), &newer));
        assert_eq!(newer.group_names(), ["temp"]);

        assert!(g.discard(&newer));
        assert!(g.is_empty());
        assert!(newer.group_names().is_empty());
    }
}
