//! # Per-event configuration.
//!
//! Provides [`EventConfig`] settings consulted by every dispatch pass of one
//! event, and the [`FailurePolicy`] that decides what a listener failure does
//! to the rest of the pass.
//!
//! Config is used in two ways:
//! 1. **Direct**: `Event::with_config(name, config)`
//! 2. **Builder**: `Event::builder(name).with_failure_policy(..).build()`

use tokio::runtime::Handle;

/// What a listener failure does to the remainder of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it to the caller (default).
    ///
    /// Remaining listeners and the after-each-call hook do not run.
    #[default]
    Propagate,

    /// Log and record every failure, keep running the remaining listeners.
    ///
    /// The pass returns normally; failures are listed in the
    /// [`CallReport`](crate::CallReport).
    Collect,
}

impl FailurePolicy {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailurePolicy::Propagate => "propagate",
            FailurePolicy::Collect => "collect",
        }
    }
}

/// Configuration of a single event.
///
/// ## Field semantics
/// - `failure_policy`: listener failure handling (see [`FailurePolicy`])
/// - `runtime`: tokio runtime used by `call_async` (`None` = ambient runtime,
///   or the crate's shared dispatch runtime when called outside of one)
#[derive(Clone, Debug, Default)]
pub struct EventConfig {
    /// Listener failure handling for every pass of this event.
    pub failure_policy: FailurePolicy,

    /// Runtime that executes asynchronous passes.
    pub runtime: Option<Handle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_propagates() {
        let cfg = EventConfig::default();
        assert_eq!(cfg.failure_policy, FailurePolicy::Propagate);
        assert!(cfg.runtime.is_none());
    }
}
