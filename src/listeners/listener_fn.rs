//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(&P) -> Result<(), ListenerError>`.
//! The closure is shared by every pass; if it needs mutable state, keep it
//! behind an `Arc<...>` with interior mutability explicitly.
//!
//! ## Example
//! ```rust
//! use eventvisor::{ListenerFn, ListenerRef, ListenerError};
//!
//! let l: ListenerRef<u32> = ListenerFn::arc("double", |n: &u32| {
//!     println!("{}", n * 2);
//!     Ok::<_, ListenerError>(())
//! })
//! .unwrap();
//!
//! assert_eq!(l.id().as_str(), "double");
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{EventError, ListenerError};
use crate::listeners::listener::{Listener, ListenerId};

/// Function-backed listener implementation.
pub struct ListenerFn<P, F> {
    id: ListenerId,
    f: F,
    _payload: PhantomData<fn(&P)>,
}

impl<P, F> ListenerFn<P, F>
where
    F: Fn(&P) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    /// Creates a listener with a caller-supplied id.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if `id` is blank.
    pub fn new(id: impl Into<Arc<str>>, f: F) -> Result<Self, EventError> {
        Ok(Self::with_id(ListenerId::new(id)?, f))
    }

    /// Creates a listener with an already validated id.
    pub fn with_id(id: ListenerId, f: F) -> Self {
        Self {
            id,
            f,
            _payload: PhantomData,
        }
    }

    /// Creates a listener with a generated (UUID v4) id.
    pub fn anonymous(f: F) -> Self {
        Self::with_id(ListenerId::random(), f)
    }

    /// Creates the listener and returns it as a shared handle.
    ///
    /// # Errors
    /// Returns [`EventError::Config`] if `id` is blank.
    pub fn arc(id: impl Into<Arc<str>>, f: F) -> Result<Arc<Self>, EventError> {
        Self::new(id, f).map(Arc::new)
    }
}

impl<P, F> Listener<P> for ListenerFn<P, F>
where
    P: 'static,
    F: Fn(&P) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    fn id(&self) -> &ListenerId {
        &self.id
    }

    fn exec(&self, payload: &P) -> Result<(), ListenerError> {
        (self.f)(payload)
    }
}

impl<P, F> fmt::Debug for ListenerFn<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerFn").field("id", &self.id).finish()
    }
}
