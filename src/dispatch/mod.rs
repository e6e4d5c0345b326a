//! Event dispatch core.
//!
//! ## Contents
//! - [`Event`] listener registry + synchronous/asynchronous dispatch
//! - [`EventBuilder`], [`EventConfig`], [`FailurePolicy`] per-event settings
//! - [`CallReport`] outcome of a pass, [`CallHandle`] pending async pass
//! - [`HookKind`], [`CallHook`], [`ListenerHook`] lifecycle hooks
//!
//! ## Wiring
//! ```text
//! Event
//!   ├─ registry  (DashMap<id, PrioritizedListener>)  ◄── add/remove/update
//!   ├─ hooks     (4 replaceable slots)
//!   ├─ call_lock (reentrant mutex, one pass at a time)
//!   └─ groups    (membership markers, written by EventGroup)
//!
//! call() ──► ordering::sort_for_dispatch ──► guard::run(listener) ──► signal::take()
//! call_async() ──► handle::dispatch_runtime ──► spawn_blocking(call)
//! ```

mod builder;
mod config;
mod event;
mod guard;
mod handle;
mod hooks;
mod ordering;
mod registry;
mod report;
mod signal;

pub use builder::EventBuilder;
pub use config::{EventConfig, FailurePolicy};
pub use event::Event;
pub use handle::CallHandle;
pub use hooks::{CallHook, HookKind, ListenerHook};
pub use ordering::DEFAULT_PRIORITY;
pub use report::CallReport;
