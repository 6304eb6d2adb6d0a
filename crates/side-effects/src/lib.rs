//! Side Effects
//!
//! Decouples a "trigger" function from the external side effects
//! (notifications, CRM updates, search indexing) that should run after it
//! completes successfully.
//!
//! # Overview
//!
//! Triggers are labelled with an event name. Side-effect functions bind
//! themselves to the same name. When a trigger succeeds, every function bound
//! to its label runs with the trigger's arguments.
//!
//! # Architecture
//!
//! 1. **Registry** (`registry`): ordered bindings per label, populated at startup
//! 2. **Binder** (`binder`): registers side-effect functions without altering them
//! 3. **Trigger** (`trigger`): runs a function, judges success, dispatches its label
//! 4. **Dispatcher** (`dispatcher`): runs bindings with per-function failure isolation
//! 5. **Suppression** (`suppress`): records instead of running side effects, for tests
//! 6. **Introspection** (`introspect`, `checks`, `cli`): documentation and consistency reports
//!
//! # Quick Start
//!
//! ```ignore
//! use side_effects::{has_side_effects, is_side_effect_of, side_effect};
//!
//! /// Update CRM.
//! fn update_crm(profile: &Profile) -> anyhow::Result<()> {
//!     crm::push(profile)
//! }
//!
//! // at startup
//! is_side_effect_of("update_profile").bind(side_effect!(update_crm).doc("Update CRM."));
//!
//! let update_profile = has_side_effects("update_profile", |profile: &Profile| {
//!     store.save(profile)
//! });
//!
//! // runs update_crm if save returned Ok
//! update_profile(&profile)?;
//! ```
//!
//! # Execution Model
//!
//! Dispatch is synchronous and happens on the caller's thread before the
//! trigger returns. There is no queue, retry or timeout: a side effect that
//! needs to be asynchronous should enqueue work onto the application's own
//! task queue. A slow side effect delays the trigger's return.
//!
//! # Error Handling
//!
//! A failing side effect (error, panic or signature mismatch) is logged via
//! `tracing` and never reaches the trigger's caller; the remaining functions
//! bound to the label still run. The trigger's own return value is always
//! handed back unchanged.
//!
//! # Configuration
//!
//! `SIDE_EFFECTS_DISABLED` turns all side effects off and
//! `SIDE_EFFECTS_TEST_MODE` records them as suppressed. Both are read on
//! every trigger call; missing or malformed values leave side effects on.

pub mod binder;
pub mod checks;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod introspect;
pub mod registry;
pub mod suppress;
pub mod trigger;
pub mod types;

// Re-export public types
pub use binder::{is_side_effect_of, Binder, SideEffectFn};
pub use checks::{check_function_signatures, CheckLevel, CheckMessage};
pub use config::{EnvKillSwitch, KillSwitch, SharedKillSwitch, SideEffectsConfig};
pub use dispatcher::{run_side_effects, DispatchOutcome, DispatchReport};
pub use error::{Result, SideEffectsError};
pub use introspect::{docstring, sort_events, Introspector};
pub use registry::{global, register_side_effect, Events, LabelFilter, SideEffectRegistry};
pub use suppress::{disable_side_effects, is_suppressed, with_side_effects_disabled, SuppressionGuard};
pub use trigger::{always, has_side_effects, http_response_check, HttpStatus, Outcome, Trigger};
pub use types::{BindingInfo, FiredEvents, Invocation, SideEffectBinding};
