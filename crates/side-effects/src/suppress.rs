//! Suppressing side effects, mostly for tests
//!
//! While a [`SuppressionGuard`] is alive, successful triggers on the same
//! thread do not run their side effects. The label that would have fired is
//! appended to the guard's [`FiredEvents`] log instead.
//!
//! Guards nest: only the innermost active guard records, and dropping it
//! hands control back to the enclosing guard (or to live dispatch). Each
//! thread has its own stack of guards, so concurrently running tests never
//! see each other's logs.
//!
//! # Examples
//!
//! ```ignore
//! use side_effects::disable_side_effects;
//!
//! let events = {
//!     let guard = disable_side_effects();
//!     update_profile(&profile);
//!     guard.events()
//! };
//! assert_eq!(events.labels(), ["update_profile"]);
//! ```

use std::{cell::RefCell, marker::PhantomData};

use tracing::debug;

use crate::types::FiredEvents;

thread_local! {
    static ACTIVE: RefCell<Vec<FiredEvents>> = const { RefCell::new(Vec::new()) };
}

/// Scope during which side effects on this thread are recorded, not run
///
/// Interception ends when the guard is dropped, including during unwinding.
#[must_use = "side effects are only suppressed while the guard is alive"]
#[derive(Debug)]
pub struct SuppressionGuard {
    events: FiredEvents,
    // The guard refers to thread-local state and must stay on its thread.
    _not_send: PhantomData<*const ()>,
}

impl SuppressionGuard {
    /// Handle to this scope's log; stays readable after the guard is dropped
    pub fn events(&self) -> FiredEvents {
        self.events.clone()
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        // Guards may be dropped out of order; only this guard's entry goes.
        let _ = ACTIVE.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(index) = stack.iter().rposition(|log| log.same_log(&self.events)) {
                stack.remove(index);
            }
            debug!(remaining = stack.len(), "Suppression scope ended");
        });
    }
}

/// Start suppressing side effects on the current thread
pub fn disable_side_effects() -> SuppressionGuard {
    let events = FiredEvents::new();
    let depth = ACTIVE.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(events.clone());
        stack.len()
    });
    debug!(depth, "Side effects disabled");

    SuppressionGuard {
        events,
        _not_send: PhantomData,
    }
}

/// Run `f` with side effects suppressed, passing it the log
///
/// The log is handed over as an explicit argument, e.g. to a test body.
pub fn with_side_effects_disabled<T>(f: impl FnOnce(&FiredEvents) -> T) -> T {
    let guard = disable_side_effects();
    let events = guard.events();
    f(&events)
}

/// Whether a suppression scope is active on the current thread
pub fn is_suppressed() -> bool {
    ACTIVE
        .try_with(|stack| !stack.borrow().is_empty())
        .unwrap_or(false)
}

/// Record `label` in the innermost active log
///
/// Returns false, recording nothing, when no scope is active.
pub(crate) fn intercept(label: &str) -> bool {
    ACTIVE
        .try_with(|stack| match stack.borrow().last() {
            Some(events) => {
                events.push(label);
                true
            }
            None => false,
        })
        .unwrap_or(false)
}
