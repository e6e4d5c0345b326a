//! # Per-thread break signal.
//!
//! A listener stops the remainder of the current pass by raising the signal
//! ([`Event::break_loop`](crate::Event::break_loop)). The flag lives in
//! thread-local storage, so passes running on other threads never observe it.
//!
//! ## Rules
//! - Every pass owns the flag while it runs: entering a pass parks the
//!   caller's pending value and clears it; leaving the pass restores it.
//! - Cleared as soon as the dispatch loop observes it.
//! - A signal raised outside any pass is discarded by the next outermost pass.
//!
//! Nested passes (a listener calling another event, or its own) therefore
//! never consume or erase a break the enclosing pass has not seen yet.

use std::cell::Cell;

thread_local! {
    static BREAK_REQUESTED: Cell<bool> = const { Cell::new(false) };
    static PASS_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Raises the break flag for the calling thread.
#[inline]
pub(crate) fn raise() {
    BREAK_REQUESTED.with(|flag| flag.set(true));
}

/// Returns whether the flag was raised and clears it.
#[inline]
pub(crate) fn take() -> bool {
    BREAK_REQUESTED.with(|flag| flag.replace(false))
}

/// Flag ownership of one running pass; restores the enclosing state on drop.
pub(crate) struct PassScope {
    parked: bool,
}

/// Starts a pass on the calling thread with a cleared flag.
pub(crate) fn enter() -> PassScope {
    let outer = PASS_DEPTH.with(|depth| depth.replace(depth.get() + 1));
    let pending = BREAK_REQUESTED.with(|flag| flag.replace(false));
    PassScope {
        // outside any pass a pending flag is stale
        parked: outer > 0 && pending,
    }
}

impl Drop for PassScope {
    fn drop(&mut self) {
        BREAK_REQUESTED.with(|flag| flag.set(self.parked));
        PASS_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_flag() {
        let _pass = enter();
        assert!(!take());
        raise();
        assert!(take());
        assert!(!take());
    }

    #[test]
    fn test_flag_is_thread_scoped() {
        let _pass = enter();
        raise();
        let other = std::thread::spawn(take).join().unwrap();
        assert!(!other, "flag leaked into another thread");
        assert!(take());
    }

    #[test]
    fn test_nested_pass_keeps_outer_flag() {
        let outer = enter();
        raise();
        {
            let _inner = enter();
            assert!(!take());
            raise();
        }
        assert!(take());
        drop(outer);
    }

    #[test]
    fn test_outermost_pass_discards_stale_flag() {
        raise();
        {
            let _pass = enter();
            assert!(!take());
        }
        assert!(!take());
    }
}
