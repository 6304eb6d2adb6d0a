//! Dispatching a label to its bound side-effect functions
//!
//! [`SideEffectRegistry::run_side_effects`](crate::SideEffectRegistry::run_side_effects)
//! is the single path every trigger goes through after it succeeded:
//!
//! 1. If the kill switch is on, nothing runs and nothing is recorded
//! 2. If a suppression scope is active, the label is recorded in its log and
//!    nothing runs; test mode behaves the same way, logging the label when no
//!    scope is active
//! 3. Otherwise every function bound to the label runs in registration order
//!
//! A failing function never stops its siblings and never reaches the
//! trigger's caller; failures are logged and collected into the
//! [`DispatchReport`].

pub mod event;
pub mod report;

pub use report::{DispatchOutcome, DispatchReport};

/// Dispatch `label` through the process-wide registry
pub fn run_side_effects<A: 'static, R: 'static>(
    label: &str,
    args: &A,
    return_value: &R,
) -> DispatchReport {
    crate::registry::global().run_side_effects(label, args, return_value)
}
