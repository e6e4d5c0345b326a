//! Panic isolation for listener and hook invocations.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if a listener panics while holding a lock of its own.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::ListenerError;

/// Runs `f`, turning a panic into [`ListenerError::Panicked`].
pub(crate) fn run<F>(f: F) -> Result<(), ListenerError>
where
    F: FnOnce() -> Result<(), ListenerError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(res) => res,
        Err(panic_err) => Err(ListenerError::Panicked {
            info: panic_message(&*panic_err),
        }),
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_through_result() {
        assert!(run(|| Ok(())).is_ok());
        assert_eq!(run(|| Err("boom".into())), Err(ListenerError::fail("boom")));
    }

    #[test]
    fn test_panic_becomes_error() {
        let err = run(|| panic!("listener exploded")).unwrap_err();
        assert_eq!(
            err,
            ListenerError::Panicked {
                info: "listener exploded".into()
            }
        );

        let code = 7;
        let err = run(|| panic!("code {code}")).unwrap_err();
        assert_eq!(err.as_label(), "listener_panic");
        assert_eq!(err.to_string(), "panicked: code 7");
    }
}
