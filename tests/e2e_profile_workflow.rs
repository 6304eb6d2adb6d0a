//! End-to-End Test Suite: profile update workflow
//!
//! Wires an application the way a host would: side effects bound at startup,
//! a trigger around a store write, settings loaded from YAML, a startup
//! signature check and the documentation report run from CI.

use std::{fs, sync::Arc};

use parking_lot::Mutex;
use side_effects::{
    check_function_signatures,
    cli::{DisplayArgs, DisplayCli},
    with_side_effects_disabled, CheckLevel, DispatchOutcome, SideEffectFn, SideEffectRegistry,
    SideEffectsConfig, Trigger,
};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
struct Profile {
    user_id: u32,
    email: String,
}

#[derive(Debug, Default)]
struct Outbox {
    crm: Vec<u32>,
    emails: Vec<String>,
}

fn build_registry(config: SideEffectsConfig, outbox: &Arc<Mutex<Outbox>>) -> SideEffectRegistry {
    let registry = SideEffectRegistry::with_kill_switch(Arc::new(config));

    let crm = outbox.clone();
    registry.is_side_effect_of("update_profile").bind(
        SideEffectFn::new("push_to_crm", move |profile: &Profile| {
            crm.lock().crm.push(profile.user_id);
            Ok(())
        })
        .module("app::crm")
        .doc("Update CRM."),
    );

    let mail = outbox.clone();
    registry.is_side_effect_of("update_profile").bind(
        SideEffectFn::with_return_value(
            "send_confirmation",
            move |profile: &Profile, status: &http::StatusCode| {
                anyhow::ensure!(profile.email.contains('@'), "invalid address {}", profile.email);
                mail.lock().emails.push(format!("{} {}", profile.email, status.as_u16()));
                Ok(())
            },
        )
        .module("app::mail"),
    );

    registry
}

fn save_profile(profile: &Profile) -> http::StatusCode {
    if profile.user_id == 0 {
        http::StatusCode::BAD_REQUEST
    } else {
        http::StatusCode::OK
    }
}

#[test]
fn test_profile_update_runs_side_effects() {
    let outbox = Arc::new(Mutex::new(Outbox::default()));
    let registry = build_registry(SideEffectsConfig::default(), &outbox);
    let update_profile = Trigger::new("update_profile").registry(&registry).wrap(save_profile);

    let status = update_profile(&Profile {
        user_id: 7,
        email: "ann@example.com".to_string(),
    });
    assert_eq!(status, http::StatusCode::OK);

    let rejected = update_profile(&Profile {
        user_id: 0,
        email: "nobody@example.com".to_string(),
    });
    assert_eq!(rejected, http::StatusCode::BAD_REQUEST);

    let outbox = outbox.lock();
    assert_eq!(outbox.crm, [7]);
    assert_eq!(outbox.emails, ["ann@example.com 200"]);
}

#[test]
fn test_failed_email_does_not_block_crm() {
    let outbox = Arc::new(Mutex::new(Outbox::default()));
    let registry = build_registry(SideEffectsConfig::default(), &outbox);
    let trigger = Trigger::new("update_profile").registry(&registry);

    let (status, report) = trigger.call_with_report(
        save_profile,
        &Profile {
            user_id: 3,
            email: "not-an-address".to_string(),
        },
    );

    assert_eq!(status, http::StatusCode::OK);
    let report = report.expect("save succeeded");
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].function_name(), Some("app::mail::send_confirmation"));
    assert_eq!(outbox.lock().crm, [3]);
}

#[test]
fn test_yaml_settings_control_dispatch() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("side_effects.yaml");
    fs::write(&path, "disabled: true\n").unwrap();

    let config = SideEffectsConfig::load_from_path(&path).unwrap();
    let outbox = Arc::new(Mutex::new(Outbox::default()));
    let registry = build_registry(config, &outbox);
    let update_profile = Trigger::new("update_profile").registry(&registry).wrap(save_profile);

    // Disabled beats an active suppression scope: nothing runs, nothing is recorded.
    with_side_effects_disabled(|events| {
        update_profile(&Profile {
            user_id: 1,
            email: "a@b.c".to_string(),
        });
        assert!(events.is_empty());
    });
    assert!(outbox.lock().crm.is_empty());

    fs::write(&path, "test_mode: true\n").unwrap();
    let config = SideEffectsConfig::load_from_path(&path).unwrap();
    let outbox = Arc::new(Mutex::new(Outbox::default()));
    let registry = build_registry(config, &outbox);

    let report = registry.run_side_effects(
        "update_profile",
        &Profile {
            user_id: 2,
            email: "a@b.c".to_string(),
        },
        &http::StatusCode::OK,
    );
    assert!(matches!(report.outcome, DispatchOutcome::Suppressed));
    assert!(outbox.lock().crm.is_empty());
}

#[test]
fn test_startup_checks_flag_mismatched_signatures() {
    let outbox = Arc::new(Mutex::new(Outbox::default()));
    let registry = build_registry(SideEffectsConfig::default(), &outbox);
    assert!(check_function_signatures(&registry).is_empty());

    registry.register(
        "update_profile",
        SideEffectFn::new("legacy_hook", |_: &u32| Ok(())).module("app::legacy"),
    );
    let messages = check_function_signatures(&registry);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, CheckLevel::Warning);

    // The mismatched binding fails on its own; the others still run.
    let trigger = Trigger::new("update_profile").registry(&registry);
    let (_, report) = trigger.call_with_report(
        save_profile,
        &Profile {
            user_id: 9,
            email: "z@example.com".to_string(),
        },
    );
    assert_eq!(report.expect("save succeeded").failures().len(), 1);
    assert_eq!(outbox.lock().crm, [9]);
}

#[test]
fn test_report_for_ci() {
    let outbox = Arc::new(Mutex::new(Outbox::default()));
    let registry = build_registry(SideEffectsConfig::default(), &outbox);

    let raw = DisplayCli::new(&registry)
        .execute(&DisplayArgs {
            raw: true,
            ..Default::default()
        })
        .unwrap();
    let json_start = raw.stdout.find('{').unwrap();
    let json_end = raw.stdout.rfind('}').unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&raw.stdout[json_start..=json_end]).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({
            "update_profile": ["app::crm::push_to_crm", "app::mail::send_confirmation"]
        })
    );

    let strict = DisplayCli::new(&registry)
        .execute(&DisplayArgs {
            strict: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(strict.exit_code, 1);
    assert_eq!(strict.missing_docstrings, ["app::mail::send_confirmation"]);
    assert!(strict.stdout.contains("  - Update CRM."));
}
