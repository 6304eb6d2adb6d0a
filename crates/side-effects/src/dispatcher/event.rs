//! Label dispatch implementation

use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
};

use tracing::{debug, error, info};

use super::report::{DispatchOutcome, DispatchReport};
use crate::{
    error::SideEffectsError,
    registry::SideEffectRegistry,
    suppress,
    types::{Invocation, SideEffectBinding},
};

impl SideEffectRegistry {
    /// Run the functions bound to `label`, or suppress them as appropriate
    ///
    /// Every bound function receives `args`; functions registered with
    /// [`SideEffectFn::with_return_value`](crate::SideEffectFn::with_return_value)
    /// also receive `return_value`.
    pub fn run_side_effects<A: 'static, R: 'static>(
        &self,
        label: &str,
        args: &A,
        return_value: &R,
    ) -> DispatchReport {
        if self.kill_switch().is_disabled() {
            debug!(label = %label, "Side effects disabled, skipping dispatch");
            return DispatchReport::new(label, DispatchOutcome::Disabled);
        }

        if suppress::intercept(label) {
            debug!(label = %label, "Side effects suppressed");
            return DispatchReport::new(label, DispatchOutcome::Suppressed);
        }

        if self.kill_switch().is_test_mode() {
            info!(label = %label, "Test mode on, side effects suppressed");
            return DispatchReport::new(label, DispatchOutcome::Suppressed);
        }

        let bindings = self.lookup(label);
        if bindings.is_empty() {
            debug!(label = %label, "No side effects registered for label");
            return DispatchReport::new(
                label,
                DispatchOutcome::Dispatched {
                    invoked: 0,
                    failures: Vec::new(),
                },
            );
        }

        info!(
            label = %label,
            binding_count = bindings.len(),
            "Running side effects"
        );

        let invocation = Invocation::new(args, return_value);
        let mut failures = Vec::new();

        for binding in &bindings {
            if let Err(e) = run_binding(binding, &invocation) {
                error!(
                    label = %label,
                    function = %binding.qualified_name(),
                    error = %e,
                    "Error running side_effect function"
                );
                failures.push(e);
            }
        }

        DispatchReport::new(
            label,
            DispatchOutcome::Dispatched {
                invoked: bindings.len(),
                failures,
            },
        )
    }
}

/// Run one binding, turning a panic into an error
fn run_binding(binding: &SideEffectBinding, invocation: &Invocation<'_>) -> Result<(), SideEffectsError> {
    debug!(function = %binding.qualified_name(), "Running side_effect function");

    match catch_unwind(AssertUnwindSafe(|| binding.invoke(invocation))) {
        Ok(result) => result,
        Err(payload) => Err(SideEffectsError::SideEffectPanicked {
            name: binding.qualified_name(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::{
        config::SharedKillSwitch, suppress::disable_side_effects, SideEffectFn,
    };

    fn test_registry() -> (SideEffectRegistry, Arc<SharedKillSwitch>) {
        let switch = Arc::new(SharedKillSwitch::new());
        (SideEffectRegistry::with_kill_switch(switch.clone()), switch)
    }

    fn recorder(
        calls: &Arc<Mutex<Vec<String>>>,
        name: &'static str,
    ) -> SideEffectFn<u32> {
        let calls = calls.clone();
        SideEffectFn::new(name, move |arg: &u32| {
            calls.lock().push(format!("{}({})", name, arg));
            Ok(())
        })
    }

    #[test]
    fn test_dispatch_runs_bindings_in_order() {
        let (registry, _) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", recorder(&calls, "f1"));
        registry.register("foo", recorder(&calls, "f2"));

        let report = registry.run_side_effects("foo", &7u32, &());

        assert_eq!(report.invoked(), 2);
        assert!(report.is_clean());
        assert_eq!(*calls.lock(), ["f1(7)", "f2(7)"]);
    }

    #[test]
    fn test_dispatch_unknown_label() {
        let (registry, _) = test_registry();
        let report = registry.run_side_effects("nothing", &(), &());

        assert!(report.fired());
        assert_eq!(report.invoked(), 0);
    }

    #[test]
    fn test_dispatch_isolates_errors() {
        let (registry, _) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", recorder(&calls, "f1"));
        registry.register(
            "foo",
            SideEffectFn::new("broken", |_: &u32| Err(anyhow::anyhow!("backend down"))),
        );
        registry.register("foo", recorder(&calls, "f3"));

        let report = registry.run_side_effects("foo", &1u32, &());

        assert_eq!(report.invoked(), 3);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].function_name(), Some("broken"));
        assert_eq!(*calls.lock(), ["f1(1)", "f3(1)"]);
    }

    #[test]
    fn test_dispatch_isolates_panics() {
        let (registry, _) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", SideEffectFn::new("panics", |_: &u32| panic!("Pah.")));
        registry.register("foo", recorder(&calls, "after"));

        let report = registry.run_side_effects("foo", &1u32, &());

        assert!(matches!(
            &report.failures()[0],
            SideEffectsError::SideEffectPanicked { message, .. } if message == "Pah."
        ));
        assert_eq!(*calls.lock(), ["after(1)"]);
    }

    #[test]
    fn test_dispatch_reports_signature_mismatch() {
        let (registry, _) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", recorder(&calls, "typed"));

        let report = registry.run_side_effects("foo", &"wrong", &());

        assert!(matches!(
            report.failures()[0],
            SideEffectsError::SignatureMismatch { .. }
        ));
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_kill_switch_skips_dispatch_and_log() {
        let (registry, switch) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", recorder(&calls, "f1"));
        switch.set_disabled(true);

        let guard = disable_side_effects();
        let report = registry.run_side_effects("foo", &1u32, &());

        assert!(!report.fired());
        assert!(guard.events().is_empty());
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_suppression_records_label() {
        let (registry, _) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", recorder(&calls, "f1"));

        let guard = disable_side_effects();
        let report = registry.run_side_effects("foo", &1u32, &());

        assert!(matches!(report.outcome, DispatchOutcome::Suppressed));
        assert_eq!(guard.events().labels(), ["foo"]);
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_test_mode_suppresses() {
        let (registry, switch) = test_registry();
        let calls = Arc::new(Mutex::new(Vec::new()));
        registry.register("foo", recorder(&calls, "f1"));
        switch.set_test_mode(true);

        let report = registry.run_side_effects("foo", &1u32, &());

        assert!(matches!(report.outcome, DispatchOutcome::Suppressed));
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42u8), "non-string panic payload");
    }
}
