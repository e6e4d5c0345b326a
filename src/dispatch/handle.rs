//! # Asynchronous dispatch handle.
//!
//! [`CallHandle`] represents a pass submitted with
//! [`Event::call_async`](crate::Event::call_async). It resolves to exactly what
//! the synchronous [`Event::call`](crate::Event::call) would have returned.
//!
//! ## Runtime selection
//! ```text
//! EventConfig::runtime ──► set?  ──► use it
//!          │ no
//!          ▼
//! Handle::try_current() ──► inside a runtime? ──► use it
//!          │ no
//!          ▼
//! shared dispatch runtime (lazily started, lives for the process)
//! ```
//!
//! Passes run on the runtime's blocking pool (`spawn_blocking`): listeners are
//! synchronous and may block, and the break signal is per-thread.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::{JoinError, JoinHandle};

use crate::dispatch::report::CallReport;
use crate::error::EventError;

static SHARED_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Picks the runtime for an asynchronous pass.
pub(crate) fn dispatch_runtime(configured: Option<&Handle>) -> Result<Handle, EventError> {
    if let Some(handle) = configured {
        return Ok(handle.clone());
    }
    if let Ok(handle) = Handle::try_current() {
        return Ok(handle);
    }
    shared_runtime().map(|rt| rt.handle().clone())
}

fn shared_runtime() -> Result<&'static Runtime, EventError> {
    if let Some(rt) = SHARED_RUNTIME.get() {
        return Ok(rt);
    }

    let rt = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("eventvisor-dispatch")
        .build()
        .map_err(|e| EventError::Runtime {
            reason: e.to_string(),
        })?;

    // losing an init race drops our copy; we are outside any runtime here, so that is allowed
    let _ = SHARED_RUNTIME.set(rt);
    SHARED_RUNTIME.get().ok_or_else(|| EventError::Runtime {
        reason: "shared runtime not initialized".to_string(),
    })
}

enum State {
    Spawned(JoinHandle<Result<CallReport, EventError>>),
    Failed(Option<EventError>),
}

/// Handle to a pass running on a worker thread.
///
/// Await it from async code, or call [`wait`](CallHandle::wait) from
/// synchronous code. Dropping the handle does not cancel the pass.
#[must_use = "dropping a CallHandle discards the pass outcome"]
pub struct CallHandle {
    event: Arc<str>,
    state: State,
}

impl CallHandle {
    pub(crate) fn spawned(event: Arc<str>, join: JoinHandle<Result<CallReport, EventError>>) -> Self {
        Self {
            event,
            state: State::Spawned(join),
        }
    }

    pub(crate) fn failed(event: Arc<str>, err: EventError) -> Self {
        Self {
            event,
            state: State::Failed(Some(err)),
        }
    }

    /// Name of the dispatched event.
    pub fn event_name(&self) -> &str {
        &self.event
    }

    /// Returns `true` once the pass has finished (or could not be started).
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Spawned(join) => join.is_finished(),
            State::Failed(_) => true,
        }
    }

    /// Blocks the current thread until the pass finishes.
    ///
    /// Do not call this from inside an async task; `.await` the handle instead.
    pub fn wait(self) -> Result<CallReport, EventError> {
        futures::executor::block_on(self)
    }

    fn join_error(&self, err: &JoinError) -> EventError {
        let reason = if err.is_panic() {
            "dispatch worker panicked".to_string()
        } else if err.is_cancelled() {
            "dispatch worker cancelled".to_string()
        } else {
            err.to_string()
        };
        EventError::AsyncJoin {
            event: self.event.to_string(),
            reason,
        }
    }
}

impl Future for CallHandle {
    type Output = Result<CallReport, EventError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let joined = match &mut this.state {
            State::Spawned(join) => match Pin::new(join).poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(joined) => joined,
            },
            State::Failed(err) => {
                let err = err.take().unwrap_or_else(|| EventError::AsyncJoin {
                    event: this.event.to_string(),
                    reason: "handle polled after completion".to_string(),
                });
                return Poll::Ready(Err(err));
            }
        };
        Poll::Ready(joined.unwrap_or_else(|je| Err(this.join_error(&je))))
    }
}
