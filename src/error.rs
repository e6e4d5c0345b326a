//! Error types used by events, listeners and the group registry.
//!
//! This module defines two main error enums:
//!
//! - [`EventError`] — errors raised by the dispatch core and the group layer.
//! - [`ListenerError`] — errors raised by a single listener (or hook) execution.
//!
//! A [`ListenerError`] never reaches the caller of [`Event::call`](crate::Event::call)
//! bare: it is always wrapped into [`EventError::ListenerExecution`] or
//! [`EventError::Hook`] together with the event (and listener) it came from.

use thiserror::Error;

use crate::dispatch::HookKind;

/// # Errors produced by the dispatch core and the group registry.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum EventError {
    /// Invalid argument detected at the point of construction/registration
    /// (blank event name, blank listener id, blank group name).
    #[error("invalid configuration: {reason}")]
    Config {
        /// What was wrong.
        reason: String,
    },

    /// A listener (or one of the hooks wrapped around it) failed.
    #[error("listener execution failed: {listener} in event: {event}")]
    ListenerExecution {
        /// Id of the failing listener.
        listener: String,
        /// Name of the event being dispatched.
        event: String,
        /// Original failure.
        #[source]
        source: ListenerError,
    },

    /// A before/after-each-call hook failed; the pass was aborted.
    #[error("{hook} hook failed in event: {event}")]
    Hook {
        /// Name of the event being dispatched.
        event: String,
        /// Which hook failed.
        hook: HookKind,
        /// Original failure.
        #[source]
        source: ListenerError,
    },

    /// Event is not registered in the given group.
    #[error("event not found: {event} in group: {group}")]
    EventNotFound {
        /// Requested event name.
        event: String,
        /// Group that was searched.
        group: String,
    },

    /// Group does not exist in the manager.
    #[error("event group not found: {group}")]
    GroupNotFound {
        /// Requested group name.
        group: String,
    },

    /// Removal attempted on a protected group.
    #[error("cannot modify protected group: {group}")]
    ProtectedGroup {
        /// Protected group name.
        group: String,
    },

    /// Asynchronous dispatch worker panicked or was cancelled before reporting.
    #[error("async dispatch of event {event} did not complete: {reason}")]
    AsyncJoin {
        /// Name of the event being dispatched.
        event: String,
        /// Join failure description.
        reason: String,
    },

    /// The shared dispatch runtime could not be started.
    #[error("dispatch runtime unavailable: {reason}")]
    Runtime {
        /// Underlying I/O error message.
        reason: String,
    },
}

impl EventError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::EventError;
    ///
    /// let err = EventError::GroupNotFound { group: "audit".into() };
    /// assert_eq!(err.as_label(), "group_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EventError::Config { .. } => "config_invalid",
            EventError::ListenerExecution { .. } => "listener_failed",
            EventError::Hook { .. } => "hook_failed",
            EventError::EventNotFound { .. } => "event_not_found",
            EventError::GroupNotFound { .. } => "group_not_found",
            EventError::ProtectedGroup { .. } => "group_protected",
            EventError::AsyncJoin { .. } => "async_join_failed",
            EventError::Runtime { .. } => "runtime_unavailable",
        }
    }

    /// Id of the failing listener, for listener execution failures.
    pub fn listener_id(&self) -> Option<&str> {
        match self {
            EventError::ListenerExecution { listener, .. } => Some(listener),
            _ => None,
        }
    }

    /// Name of the event the error was raised for, when known.
    pub fn event_name(&self) -> Option<&str> {
        match self {
            EventError::ListenerExecution { event, .. }
            | EventError::Hook { event, .. }
            | EventError::EventNotFound { event, .. }
            | EventError::AsyncJoin { event, .. } => Some(event),
            _ => None,
        }
    }

    /// Original listener/hook failure, if this error wraps one.
    pub fn cause(&self) -> Option<&ListenerError> {
        match self {
            EventError::ListenerExecution { source, .. } | EventError::Hook { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        EventError::Config {
            reason: reason.into(),
        }
    }
}

/// # Errors produced by listener execution.
///
/// Returned by [`Listener::exec`](crate::Listener::exec) and the listener hooks.
/// Panics inside a listener or hook are caught by the dispatch core and
/// reported as [`ListenerError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Listener reported a failure.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Listener or hook panicked.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ListenerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Fail { .. } => "listener_fail",
            ListenerError::Panicked { .. } => "listener_panic",
        }
    }
}

impl From<String> for ListenerError {
    fn from(error: String) -> Self {
        ListenerError::Fail { error }
    }
}

impl From<&str> for ListenerError {
    fn from(error: &str) -> Self {
        ListenerError::Fail {
            error: error.to_string(),
        }
    }
}
