//! Global kill switch sources

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use super::{DISABLED_ENV_VAR, TEST_MODE_ENV_VAR};

/// Process-wide dispatch switches, read on every trigger call
///
/// Implementations must never cache a value they cannot refresh: the
/// environment-backed switch reads the variable each time it is asked.
pub trait KillSwitch: Send + Sync {
    /// When true, no side effect runs and nothing is recorded
    fn is_disabled(&self) -> bool;

    /// When true, successful triggers are recorded as suppressed instead of
    /// running their side effects
    fn is_test_mode(&self) -> bool {
        false
    }
}

/// Parse a boolean flag value
///
/// Returns `None` for values that are neither truthy nor falsy.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Kill switch backed by environment variables
///
/// A missing or malformed variable leaves side effects enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvKillSwitch;

impl EnvKillSwitch {
    fn read_flag(var: &str) -> bool {
        let Some(raw) = std::env::var_os(var) else {
            return false;
        };

        match raw.to_str().and_then(parse_flag) {
            Some(flag) => flag,
            None => {
                warn!(
                    variable = var,
                    value = ?raw,
                    "Unrecognised boolean value, leaving side effects enabled"
                );
                false
            }
        }
    }
}

impl KillSwitch for EnvKillSwitch {
    fn is_disabled(&self) -> bool {
        Self::read_flag(DISABLED_ENV_VAR)
    }

    fn is_test_mode(&self) -> bool {
        Self::read_flag(TEST_MODE_ENV_VAR)
    }
}

/// Kill switch toggled in-process
///
/// Share it through an `Arc` with the registry and flip it at runtime.
#[derive(Debug, Default)]
pub struct SharedKillSwitch {
    disabled: AtomicBool,
    test_mode: AtomicBool,
}

impl SharedKillSwitch {
    /// Create a switch with side effects enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable all side effects
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    /// Turn test mode on or off
    pub fn set_test_mode(&self, test_mode: bool) {
        self.test_mode.store(test_mode, Ordering::SeqCst);
    }
}

impl KillSwitch for SharedKillSwitch {
    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn is_test_mode(&self) -> bool {
        self.test_mode.load(Ordering::SeqCst)
    }
}
