//! Listener abstraction: trait, identity and the closure-backed implementation.
//!
//! ## Contents
//! - [`Listener`], [`ListenerRef`] the unit of work invoked by an event
//! - [`ListenerId`] validated (or generated) registry key
//! - [`ListenerFn`] closure-backed listener

mod listener;
mod listener_fn;

pub use listener::{Listener, ListenerId, ListenerRef};
pub use listener_fn::ListenerFn;
