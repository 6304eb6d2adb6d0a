//! Property tests for registration and dispatch ordering
//!
//! **Property: bindings run in registration order**
//! **Property: duplicate registrations run once per registration**
//! **Property: a failing binding never prevents the others from running**

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use side_effects::{LabelFilter, SharedKillSwitch, SideEffectFn, SideEffectRegistry, Trigger};

fn test_registry() -> SideEffectRegistry {
    SideEffectRegistry::with_kill_switch(Arc::new(SharedKillSwitch::new()))
}

fn label_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

fn recording_fn(log: &Arc<Mutex<Vec<usize>>>, id: usize, fails: bool) -> SideEffectFn<u64> {
    let log = log.clone();
    SideEffectFn::new(format!("fn_{}", id), move |_: &u64| {
        log.lock().push(id);
        if fails {
            anyhow::bail!("binding {} failed", id);
        }
        Ok(())
    })
}

proptest! {
    #[test]
    fn prop_dispatch_follows_registration_order(count in 1usize..16, arg in any::<u64>()) {
        let registry = test_registry();
        let log = Arc::new(Mutex::new(Vec::new()));
        for id in 0..count {
            registry.register("event", recording_fn(&log, id, false));
        }

        let report = registry.run_side_effects("event", &arg, &());

        prop_assert_eq!(report.invoked(), count);
        prop_assert!(report.is_clean());
        prop_assert_eq!(log.lock().clone(), (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn prop_duplicates_run_once_per_registration(repeats in 1usize..8) {
        let registry = test_registry();
        let log = Arc::new(Mutex::new(Vec::new()));
        let f = recording_fn(&log, 7, false);
        for _ in 0..repeats {
            registry.register("event", f.clone());
        }

        registry.run_side_effects("event", &0u64, &());

        prop_assert_eq!(registry.lookup("event").len(), repeats);
        prop_assert_eq!(log.lock().clone(), vec![7; repeats]);
    }

    #[test]
    fn prop_failures_are_isolated(failing in proptest::collection::vec(any::<bool>(), 1..12)) {
        let registry = test_registry();
        let log = Arc::new(Mutex::new(Vec::new()));
        for (id, fails) in failing.iter().enumerate() {
            registry.register("event", recording_fn(&log, id, *fails));
        }

        let (value, report) = Trigger::new("event")
            .registry(&registry)
            .call_with_report(|x: &u64| *x, &3);

        let report = report.expect("trigger succeeded");
        prop_assert_eq!(value, 3);
        prop_assert_eq!(report.invoked(), failing.len());
        prop_assert_eq!(report.failures().len(), failing.iter().filter(|f| **f).count());
        prop_assert_eq!(log.lock().clone(), (0..failing.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_labels_are_independent(
        labels in proptest::collection::btree_set(label_strategy(), 1..6)
    ) {
        let registry = test_registry();
        let log = Arc::new(Mutex::new(Vec::new()));
        for (id, label) in labels.iter().enumerate() {
            registry.register(label.as_str(), recording_fn(&log, id, false));
        }

        prop_assert_eq!(registry.all_labels(), labels.clone());

        for (id, label) in labels.iter().enumerate() {
            log.lock().clear();
            registry.run_side_effects(label, &1u64, &());
            prop_assert_eq!(log.lock().clone(), vec![id]);
        }
    }

    #[test]
    fn prop_label_filter_matches_substring(label in label_strategy(), needle in "[a-z]{0,3}") {
        let filter = LabelFilter::Contains(needle.clone());
        prop_assert_eq!(filter.matches(&label), label.contains(needle.as_str()));
        prop_assert!(LabelFilter::All.matches(&label));
        prop_assert!(LabelFilter::Exact(label.clone()).matches(&label));
    }
}
