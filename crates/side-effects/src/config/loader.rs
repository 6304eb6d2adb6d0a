//! Settings snapshot loaded from YAML and the environment

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{parse_flag, KillSwitch, DISABLED_ENV_VAR, TEST_MODE_ENV_VAR};
use crate::error::{Result, SideEffectsError};

/// Side-effects settings
///
/// ```yaml
/// disabled: false
/// test_mode: true
/// ```
///
/// Missing keys take their default (`false`). A snapshot is itself a
/// [`KillSwitch`], for applications that want settings fixed at startup
/// rather than read from the environment on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideEffectsConfig {
    /// Disable all side effects
    pub disabled: bool,

    /// Record instead of running side effects
    pub test_mode: bool,
}

impl SideEffectsConfig {
    /// Load settings from a YAML file
    ///
    /// A file that does not exist yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No side-effects settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if !value.is_mapping() {
            return Err(SideEffectsError::InvalidConfiguration(
                "settings must be a mapping".to_string(),
            ));
        }

        Ok(serde_yaml::from_value(value)?)
    }

    /// Settings taken from the environment only
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override settings with any well-formed environment values
    pub fn merge_env(mut self) -> Self {
        if let Some(disabled) = env_flag(DISABLED_ENV_VAR) {
            self.disabled = disabled;
        }
        if let Some(test_mode) = env_flag(TEST_MODE_ENV_VAR) {
            self.test_mode = test_mode;
        }
        self
    }
}

fn env_flag(var: &str) -> Option<bool> {
    let raw = std::env::var(var).ok()?;
    let flag = parse_flag(&raw);
    if flag.is_none() {
        warn!(variable = var, value = %raw, "Ignoring unrecognised boolean value");
    }
    flag
}

impl KillSwitch for SideEffectsConfig {
    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn is_test_mode(&self) -> bool {
        self.test_mode
    }
}
