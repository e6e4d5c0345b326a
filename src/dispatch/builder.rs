use std::sync::Arc;

use tokio::runtime::Handle;

use crate::dispatch::config::{EventConfig, FailurePolicy};
use crate::dispatch::event::Event;
use crate::dispatch::ordering::DEFAULT_PRIORITY;
use crate::error::EventError;
use crate::listeners::ListenerRef;

/// Builder for constructing an [`Event`] with non-default settings.
///
/// ## Example
/// ```rust
/// use eventvisor::{Event, FailurePolicy};
///
/// let ev: Event<u64> = Event::builder("orders.placed")
///     .with_failure_policy(FailurePolicy::Collect)
///     .build()
///     .unwrap();
/// assert_eq!(ev.failure_policy(), FailurePolicy::Collect);
/// ```
pub struct EventBuilder<P> {
    name: Arc<str>,
    cfg: EventConfig,
    listeners: Vec<(ListenerRef<P>, i32)>,
}

impl<P: 'static> EventBuilder<P> {
    /// Creates a builder with the default configuration.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            cfg: EventConfig::default(),
            listeners: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: EventConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets how listener failures affect a pass.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.cfg.failure_policy = policy;
        self
    }

    /// Runs asynchronous passes on the given runtime.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.cfg.runtime = Some(runtime);
        self
    }

    /// Registers a listener with the default priority.
    pub fn with_listener(self, listener: ListenerRef<P>) -> Self {
        self.with_listener_priority(listener, DEFAULT_PRIORITY)
    }

    /// Registers a listener with an explicit priority.
    pub fn with_listener_priority(mut self, listener: ListenerRef<P>, priority: i32) -> Self {
        self.listeners.push((listener, priority));
        self
    }

    /// Builds the event; listeners are registered in the order they were given.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if the name is blank.
    pub fn build(self) -> Result<Event<P>, EventError> {
        let event = Event::with_config(self.name, self.cfg)?;
        for (listener, priority) in self.listeners {
            event.add_listener_with_priority(listener, priority);
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ListenerFn;

    #[test]
    fn test_default_build() {
        let ev: Event<()> = EventBuilder::new("builderEvent").build().unwrap();
        assert_eq!(ev.name(), "builderEvent");
        assert_eq!(ev.failure_policy(), FailurePolicy::Propagate);
    }

    #[test]
    fn test_blank_name_fails_at_build() {
        assert!(EventBuilder::<()>::new(" ").build().is_err());
    }

    #[test]
    fn test_initial_listeners_registered() {
        let a: ListenerRef<()> = ListenerFn::arc("a", |_: &()| Ok(())).unwrap();
        let b: ListenerRef<()> = ListenerFn::arc("b", |_: &()| Ok(())).unwrap();
        let ev = EventBuilder::new("e")
            .with_listener(a)
            .with_listener_priority(b, 4)
            .build()
            .unwrap();
        assert_eq!(ev.listener_ids(), ["b", "a"]);
        assert_eq!(ev.listener_priority("a"), Some(0));
    }
}
