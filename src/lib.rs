//! # eventvisor
//!
//! **Eventvisor** is an in-process event dispatch library for Rust.
//!
//! An [`Event`] is a named set of listeners. Calling it runs every listener
//! once, highest priority first, with the caller's payload. Any listener can
//! stop the rest of the pass, lifecycle hooks can wrap the pass and each
//! listener, and events can be organized into groups through an
//! [`EventManager`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Listener   │   │  ListenerFn  │   │   Listener   │
//!     │  (user impl) │   │  (closure)   │   │  (user impl) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ add_listener     ▼ (id, priority)   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Event<P>                                                         │
//! │  - Registry (DashMap id → listener + priority + registration seq) │
//! │  - Hooks (before/after each call, before/after each listener)     │
//! │  - call mutex (reentrant, one pass at a time)                     │
//! │  - group markers                                                  │
//! └──────┬──────────────────────────────────────┬─────────────────────┘
//!        │ call(&P)                             │ call_async(P)
//!        ▼                                      ▼
//!   calling thread                     runtime blocking pool
//!        │                                      │
//!        └──────────────► one pass ◄────────────┘
//!                  sorted listeners, break signal,
//!                  failure policy ──► CallReport / EventError
//!
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventManager<P>                                                  │
//! │  "default" │ "system" (protected) │ "temp" (ephemeral) │ custom…  │
//! │        └─ EventGroup<P>: name → Arc<Event<P>>                     │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Pass
//! ```text
//! lock ─► take over break flag ─► before_each_call
//!   for listener in priority desc, registration order:
//!     before_each_listener ─► before_call ─► exec ─► after_call ─► after_each_listener
//!     failure: Propagate ─► Err, stop │ Collect ─► log, record, continue
//!     break signal ─► stop
//! after_each_call ─► unlock
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits                        |
//! |----------------|----------------------------------------------------------|-------------------------------------------|
//! | **Listeners**  | Units of work invoked with the event payload.            | [`Listener`], [`ListenerFn`], [`ListenerId`] |
//! | **Dispatch**   | Prioritized sync/async passes with break and hooks.      | [`Event`], [`CallReport`], [`CallHandle`] |
//! | **Config**     | Failure policy and dispatch runtime per event.           | [`EventConfig`], [`FailurePolicy`], [`EventBuilder`] |
//! | **Groups**     | Named collections of events, built-in groups.            | [`EventGroup`], [`EventManager`]          |
//! | **Errors**     | Typed errors for dispatch and listener execution.        | [`EventError`], [`ListenerError`]         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Event, FailurePolicy, ListenerError, ListenerFn};
//!
//! let ev: Arc<Event<String>> = Arc::new(
//!     Event::builder("user.created")
//!         .with_failure_policy(FailurePolicy::Collect)
//!         .build()
//!         .unwrap(),
//! );
//!
//! ev.add_listener_with_priority(
//!     ListenerFn::arc("welcome-mail", |user: &String| {
//!         println!("mail to {user}");
//!         Ok::<_, ListenerError>(())
//!     })
//!     .unwrap(),
//!     10,
//! );
//!
//! let stopper = Arc::clone(&ev);
//! ev.add_listener(
//!     ListenerFn::arc("gate", move |_: &String| {
//!         stopper.break_loop();
//!         Ok::<_, ListenerError>(())
//!     })
//!     .unwrap(),
//! );
//!
//! let report = ev.call(&"alice".to_string()).unwrap();
//! assert_eq!(report.executed, 2);
//! assert!(report.broken);
//! ```

mod dispatch;
mod error;
mod groups;
mod listeners;

// ---- Public re-exports ----

pub use dispatch::{
    CallHandle, CallHook, CallReport, DEFAULT_PRIORITY, Event, EventBuilder, EventConfig,
    FailurePolicy, HookKind, ListenerHook,
};
pub use error::{EventError, ListenerError};
pub use groups::{DEFAULT_GROUP, EventGroup, EventManager, SYSTEM_GROUP, TEMP_GROUP};
pub use listeners::{Listener, ListenerFn, ListenerId, ListenerRef};
