//! Result of a single dispatch

use crate::error::SideEffectsError;

/// What happened when a label was dispatched
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The kill switch was on; nothing ran or was recorded
    Disabled,

    /// Side effects were suppressed; the label was recorded, nothing ran
    Suppressed,

    /// Bound functions ran
    Dispatched {
        /// Number of functions invoked
        invoked: usize,

        /// Failures, in invocation order
        failures: Vec<SideEffectsError>,
    },
}

/// Report of one dispatch
#[derive(Debug)]
pub struct DispatchReport {
    /// Label that was dispatched
    pub label: String,

    /// What happened
    pub outcome: DispatchOutcome,
}

impl DispatchReport {
    pub(crate) fn new(label: &str, outcome: DispatchOutcome) -> Self {
        Self {
            label: label.to_string(),
            outcome,
        }
    }

    /// Whether the label fired, either live or into a suppression log
    pub fn fired(&self) -> bool {
        !matches!(self.outcome, DispatchOutcome::Disabled)
    }

    /// Number of functions that were invoked
    pub fn invoked(&self) -> usize {
        match &self.outcome {
            DispatchOutcome::Dispatched { invoked, .. } => *invoked,
            _ => 0,
        }
    }

    /// Failures raised by bound functions
    pub fn failures(&self) -> &[SideEffectsError] {
        match &self.outcome {
            DispatchOutcome::Dispatched { failures, .. } => failures,
            _ => &[],
        }
    }

    /// Whether every invoked function succeeded
    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }
}
