//! # Listener abstraction and listener identity.
//!
//! This module defines the [`Listener`] trait (synchronous, fallible) and the
//! [`ListenerId`] it is keyed by. The common handle type is [`ListenerRef`],
//! an `Arc<dyn Listener<P>>` suitable for sharing between the caller and the event.
//!
//! A listener may stop the remainder of the current pass by calling
//! [`Event::break_loop`](crate::Event::break_loop) from inside [`Listener::exec`].

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{EventError, ListenerError};

/// Shared handle to a listener.
pub type ListenerRef<P> = Arc<dyn Listener<P>>;

/// Validated listener identity.
///
/// Either supplied by the caller (must not be blank) or generated as a random
/// UUID v4 string via [`ListenerId::random`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(Arc<str>);

impl ListenerId {
    /// Creates an id from a caller-supplied string.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if the id is empty or only whitespace.
    ///
    /// # Example
    /// ```
    /// use eventvisor::ListenerId;
    ///
    /// assert!(ListenerId::new("audit").is_ok());
    /// assert!(ListenerId::new("   ").is_err());
    /// ```
    pub fn new(id: impl Into<Arc<str>>) -> Result<Self, EventError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EventError::config("listener id cannot be empty"));
        }
        Ok(Self(id))
    }

    /// Generates a random id (UUID v4, hyphenated).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets registries keyed by `ListenerId` be queried with a plain `&str`.
impl Borrow<str> for ListenerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ListenerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// # Synchronous unit of work invoked by an event.
///
/// A `Listener` has a stable [`id`](Listener::id) and an [`exec`](Listener::exec)
/// method that receives the dispatched payload. The optional
/// [`before_call`](Listener::before_call) / [`after_call`](Listener::after_call)
/// hooks run immediately around `exec` in the same pass; their failures are
/// treated exactly like an `exec` failure.
///
/// # Example
/// ```
/// use eventvisor::{Listener, ListenerError, ListenerId};
///
/// struct Audit {
///     id: ListenerId,
/// }
///
/// impl Listener<String> for Audit {
///     fn id(&self) -> &ListenerId { &self.id }
///
///     fn exec(&self, payload: &String) -> Result<(), ListenerError> {
///         if payload.is_empty() {
///             return Err(ListenerError::fail("empty payload"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Listener<P>: Send + Sync + 'static {
    /// Returns the listener id; the event registry is keyed by it.
    fn id(&self) -> &ListenerId;

    /// Handles one dispatched payload.
    fn exec(&self, payload: &P) -> Result<(), ListenerError>;

    /// Runs right before [`exec`](Listener::exec).
    fn before_call(&self) -> Result<(), ListenerError> {
        Ok(())
    }

    /// Runs right after a successful [`exec`](Listener::exec).
    fn after_call(&self) -> Result<(), ListenerError> {
        Ok(())
    }
}
