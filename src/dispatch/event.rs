//! # Event - named listener set with serialized, prioritized dispatch.
//!
//! ## Pass algorithm
//! ```text
//! call(payload)
//!   ├─► lock call mutex (one pass at a time per event)
//!   ├─► take over break signal (this thread; enclosing pass state parked)
//!   ├─► before_each_call(event)            ── failure ─► Err(Hook), pass aborted
//!   ├─► snapshot + sort (priority desc, registration order)
//!   ├─► for each listener:
//!   │     ├─ before_each_listener(l)
//!   │     ├─ l.before_call() → l.exec(payload) → l.after_call()
//!   │     ├─ after_each_listener(l)
//!   │     ├─ failure ─► Propagate: Err(ListenerExecution), pass aborted
//!   │     │            Collect:   log + record, continue
//!   │     └─ break signal raised ─► clear, stop loop
//!   ├─► after_each_call(event)             ── failure ─► Err(Hook)
//!   └─► restore enclosing break state + unlock (guard drops, every exit path)
//! ```
//!
//! ## Rules
//! - Passes on one event never interleave; passes on different events are independent.
//! - The mutex is reentrant: a listener may dispatch the event it runs under.
//! - Registry changes during a pass are seen by the next pass only.
//! - Hooks are read once per pass; they fail by returning `Err`, like listeners.
//! - Panics in listeners and hooks are caught and reported as failures.
//! - A nested pass (another event, or this one) never clears a break the
//!   enclosing pass has not observed yet.
//! - A hung listener holds the mutex indefinitely; there is no timeout.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};
use tokio::runtime::Handle;
use tracing::{debug, error, trace, warn};

use crate::dispatch::builder::EventBuilder;
use crate::dispatch::config::{EventConfig, FailurePolicy};
use crate::dispatch::guard;
use crate::dispatch::handle::{self, CallHandle};
use crate::dispatch::hooks::{CallHook, HookKind, Hooks, ListenerHook};
use crate::dispatch::ordering::{DEFAULT_PRIORITY, PrioritizedListener};
use crate::dispatch::registry::Registry;
use crate::dispatch::report::CallReport;
use crate::dispatch::signal;
use crate::error::{EventError, ListenerError};
use crate::listeners::{Listener, ListenerRef};

/// Named event holding prioritized listeners.
///
/// `P` is the payload type handed to every listener of a pass.
///
/// ## Example
/// ```rust
/// use eventvisor::{Event, ListenerFn, ListenerError};
///
/// let ev: Event<String> = Event::new("user.created").unwrap();
/// ev.add_listener_with_priority(
///     ListenerFn::arc("audit", |name: &String| {
///         println!("audit {name}");
///         Ok::<_, ListenerError>(())
///     })
///     .unwrap(),
///     10,
/// );
///
/// let report = ev.call(&"alice".to_string()).unwrap();
/// assert_eq!(report.executed, 1);
/// assert!(ev.has_listener("audit"));
/// ```
pub struct Event<P> {
    name: Arc<str>,
    config: EventConfig,
    registry: Registry<P>,
    groups: RwLock<BTreeSet<String>>,
    hooks: Hooks<P>,
    call_lock: ReentrantMutex<()>,
}

impl<P: 'static> Event<P> {
    /// Creates an event with the default configuration.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if `name` is empty or only whitespace.
    pub fn new(name: impl Into<Arc<str>>) -> Result<Self, EventError> {
        Self::with_config(name, EventConfig::default())
    }

    /// Creates an event with an explicit configuration.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if `name` is empty or only whitespace.
    pub fn with_config(name: impl Into<Arc<str>>, config: EventConfig) -> Result<Self, EventError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EventError::config("event name cannot be empty"));
        }
        Ok(Self {
            name,
            config,
            registry: Registry::new(),
            groups: RwLock::new(BTreeSet::new()),
            hooks: Hooks::new(),
            call_lock: ReentrantMutex::new(()),
        })
    }

    /// Starts building an event (failure policy, runtime, initial listeners).
    pub fn builder(name: impl Into<Arc<str>>) -> EventBuilder<P> {
        EventBuilder::new(name)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    #[inline]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    // ---------------------------
    // Listener registry
    // ---------------------------

    /// Registers a listener with the default priority (`0`).
    ///
    /// A listener with the same id is replaced.
    pub fn add_listener(&self, listener: ListenerRef<P>) {
        self.add_listener_with_priority(listener, DEFAULT_PRIORITY);
    }

    /// Registers a listener with the given priority (higher runs earlier).
    ///
    /// A listener with the same id is replaced, and counts as the most
    /// recently registered among equal priorities.
    pub fn add_listener_with_priority(&self, listener: ListenerRef<P>, priority: i32) {
        let id = listener.id().clone();
        let replaced = self.registry.add(listener, priority);
        debug!(event = %self.name, listener = %id, priority, replaced, "listener registered");
    }

    /// Removes the listener with this id; returns whether it was registered.
    pub fn remove_listener(&self, id: &str) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            debug!(event = %self.name, listener = id, "listener removed");
        }
        removed
    }

    /// Removes the given listener (by its id).
    pub fn remove_listener_ref(&self, listener: &dyn Listener<P>) -> bool {
        self.remove_listener(listener.id().as_str())
    }

    #[inline]
    pub fn has_listener(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    #[inline]
    pub fn has_listener_ref(&self, listener: &dyn Listener<P>) -> bool {
        self.registry.contains(listener.id().as_str())
    }

    /// Priority of a registered listener, `None` if not registered.
    pub fn listener_priority(&self, id: &str) -> Option<i32> {
        self.registry.priority(id)
    }

    /// Changes the priority of a registered listener.
    ///
    /// Returns `false` (and changes nothing) if the id is not registered.
    pub fn update_listener_priority(&self, id: &str, priority: i32) -> bool {
        let updated = self.registry.set_priority(id, priority);
        if updated {
            debug!(event = %self.name, listener = id, priority, "listener priority updated");
        }
        updated
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Listener ids in the order the next pass would run them.
    pub fn listener_ids(&self) -> Vec<String> {
        self.registry
            .snapshot()
            .iter()
            .map(|e| e.listener.id().to_string())
            .collect()
    }

    // ---------------------------
    // Hooks
    // ---------------------------

    /// Sets the hook run once before the listeners of every pass.
    ///
    /// An `Err` (or panic) from the hook aborts the pass with [`EventError::Hook`].
    pub fn do_before_each_call<F>(&self, hook: F)
    where
        F: Fn(&Event<P>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let hook: CallHook<P> = Arc::new(hook);
        self.hooks.before_call.set(Some(hook));
    }

    /// Sets the hook run once after the listeners of every completed pass.
    ///
    /// Skipped when a pass is aborted by a propagated failure.
    pub fn do_after_each_call<F>(&self, hook: F)
    where
        F: Fn(&Event<P>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let hook: CallHook<P> = Arc::new(hook);
        self.hooks.after_call.set(Some(hook));
    }

    /// Sets the hook run before every listener; an `Err` counts as that listener's failure.
    pub fn do_before_each_listener_call<F>(&self, hook: F)
    where
        F: Fn(&dyn Listener<P>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let hook: ListenerHook<P> = Arc::new(hook);
        self.hooks.before_listener.set(Some(hook));
    }

    /// Sets the hook run after every successful listener; an `Err` counts as that listener's failure.
    pub fn do_after_each_listener_call<F>(&self, hook: F)
    where
        F: Fn(&dyn Listener<P>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let hook: ListenerHook<P> = Arc::new(hook);
        self.hooks.after_listener.set(Some(hook));
    }

    /// Removes a previously set hook.
    pub fn clear_hook(&self, kind: HookKind) {
        match kind {
            HookKind::BeforeEachCall => self.hooks.before_call.set(None),
            HookKind::AfterEachCall => self.hooks.after_call.set(None),
            HookKind::BeforeEachListener => self.hooks.before_listener.set(None),
            HookKind::AfterEachListener => self.hooks.after_listener.set(None),
        }
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Stops the remaining listeners of the pass running on this thread.
    ///
    /// Meant to be called from inside [`Listener::exec`]. The listener that
    /// calls it still completes; the after-each-call hook still runs.
    pub fn break_loop(&self) {
        trace!(event = %self.name, "break requested");
        signal::raise();
    }

    /// Runs one dispatch pass, blocking the calling thread until it finishes.
    ///
    /// # Errors
    /// - [`EventError::Hook`] if the before/after-each-call hook fails.
    /// - [`EventError::ListenerExecution`] for the first failing listener,
    ///   under [`FailurePolicy::Propagate`].
    pub fn call(&self, payload: &P) -> Result<CallReport, EventError> {
        let _pass = self.call_lock.lock();
        let _break_scope = signal::enter();

        if let Some(hook) = self.hooks.before_call.get() {
            guard::run(|| hook(self))
                .map_err(|source| self.hook_error(HookKind::BeforeEachCall, source))?;
        }

        let listeners = self.registry.snapshot();
        let total = listeners.len();
        let before = self.hooks.before_listener.get();
        let after = self.hooks.after_listener.get();
        let mut report = CallReport::default();

        debug!(
            event = %self.name,
            listeners = total,
            policy = self.config.failure_policy.as_label(),
            "dispatch pass started"
        );

        for (idx, entry) in listeners.iter().enumerate() {
            let id = entry.listener.id();
            trace!(event = %self.name, listener = %id, priority = entry.priority, "invoking listener");
            report.executed += 1;

            if let Err(source) = Self::invoke(entry, payload, before.as_ref(), after.as_ref()) {
                let err = EventError::ListenerExecution {
                    listener: id.to_string(),
                    event: self.name.to_string(),
                    source: source.clone(),
                };
                match self.config.failure_policy {
                    FailurePolicy::Propagate => {
                        debug!(
                            event = %self.name,
                            listener = %id,
                            cause = %source,
                            "listener failed; pass aborted"
                        );
                        return Err(err);
                    }
                    FailurePolicy::Collect => {
                        error!(
                            event = %self.name,
                            listener = %id,
                            cause = %source,
                            "listener failed; continuing pass"
                        );
                        report.failures.push(err);
                    }
                }
            }

            if signal::take() {
                report.broken = true;
                report.skipped = total - idx - 1;
                debug!(event = %self.name, listener = %id, skipped = report.skipped, "pass broken");
                break;
            }
        }

        if !report.is_clean() {
            warn!(
                event = %self.name,
                failures = report.failure_count(),
                "dispatch pass completed with listener failures"
            );
        }

        if let Some(hook) = self.hooks.after_call.get() {
            guard::run(|| hook(self))
                .map_err(|source| self.hook_error(HookKind::AfterEachCall, source))?;
        }

        debug!(event = %self.name, executed = report.executed, "dispatch pass finished");
        Ok(report)
    }

    /// Runs one listener with its surrounding hooks.
    fn invoke(
        entry: &PrioritizedListener<P>,
        payload: &P,
        before: Option<&ListenerHook<P>>,
        after: Option<&ListenerHook<P>>,
    ) -> Result<(), ListenerError> {
        let listener = entry.listener.as_ref();
        guard::run(|| {
            if let Some(hook) = before {
                hook(listener)?;
            }
            listener.before_call()?;
            listener.exec(payload)?;
            listener.after_call()?;
            if let Some(hook) = after {
                hook(listener)?;
            }
            Ok(())
        })
    }

    fn hook_error(&self, hook: HookKind, source: ListenerError) -> EventError {
        debug!(event = %self.name, hook = hook.as_label(), cause = %source, "hook failed; pass aborted");
        EventError::Hook {
            event: self.name.to_string(),
            hook,
            source,
        }
    }

    // ---------------------------
    // Group membership
    // ---------------------------

    /// Marks this event as a member of `group`.
    pub(crate) fn set_group_name(&self, group: &str) -> Result<&Self, EventError> {
        if group.trim().is_empty() {
            return Err(EventError::config("group name cannot be empty"));
        }
        self.groups.write().insert(group.to_string());
        Ok(self)
    }

    /// Drops the membership marker only; the group's own map is untouched.
    pub(crate) fn remove_group(&self, group: &str) {
        self.groups.write().remove(group);
    }

    /// Names of the groups this event is registered in (sorted snapshot).
    pub fn group_names(&self) -> Vec<String> {
        self.groups.read().iter().cloned().collect()
    }
}

impl<P: Send + 'static> Event<P> {
    /// Runs one dispatch pass on a worker thread and returns immediately.
    ///
    /// The pass runs on the blocking pool of, in order of preference: the
    /// runtime from [`EventConfig::runtime`], the runtime the caller is
    /// running in, or the crate's shared dispatch runtime.
    ///
    /// Failures resolve the returned [`CallHandle`] to the same wrapped
    /// [`EventError`] that [`call`](Event::call) would return.
    pub fn call_async(self: &Arc<Self>, payload: P) -> CallHandle {
        match handle::dispatch_runtime(self.config.runtime.as_ref()) {
            Ok(rt) => self.call_async_on(&rt, payload),
            Err(err) => CallHandle::failed(self.name.clone(), err),
        }
    }

    /// Like [`call_async`](Event::call_async), on a caller-supplied runtime.
    pub fn call_async_on(self: &Arc<Self>, runtime: &Handle, payload: P) -> CallHandle {
        let event = Arc::clone(self);
        trace!(event = %self.name, "async dispatch submitted");
        let join = runtime.spawn_blocking(move || event.call(&payload));
        CallHandle::spawned(self.name.clone(), join)
    }
}

impl<P: 'static> PartialEq for Event<P> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<P: 'static> Eq for Event<P> {}

impl<P: 'static> Hash for Event<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<P: 'static> fmt::Display for Event<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<P: 'static> fmt::Debug for Event<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("listeners", &self.registry.len())
            .field("groups", &*self.groups.read())
            .field("failure_policy", &self.config.failure_policy)
            .finish()
    }
}
