//! # Outcome of one dispatch pass.

use crate::error::EventError;

/// Summary returned by a completed pass.
///
/// Under [`FailurePolicy::Collect`](crate::FailurePolicy::Collect) a pass
/// completes even when listeners fail; those failures are listed in
/// [`failures`](CallReport::failures), each wrapped with the listener id and
/// event name.
#[derive(Debug, Clone, Default)]
pub struct CallReport {
    /// Listeners that were invoked (failed ones included).
    pub executed: usize,
    /// Listeners left unexecuted because the pass was broken.
    pub skipped: usize,
    /// Whether a listener raised the break signal.
    pub broken: bool,
    /// Collected listener failures, in execution order.
    pub failures: Vec<EventError>,
}

impl CallReport {
    /// `true` when no listener failed.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    #[inline]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Ids of the failed listeners, in execution order.
    pub fn failed_listeners(&self) -> Vec<&str> {
        self.failures
            .iter()
            .filter_map(EventError::listener_id)
            .collect()
    }
}
