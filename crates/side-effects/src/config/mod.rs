//! Configuration for the side-effects registry
//!
//! Dispatch consults a [`KillSwitch`] on every trigger call. The default
//! switch reads `SIDE_EFFECTS_DISABLED` and `SIDE_EFFECTS_TEST_MODE` from the
//! environment live, so tests can toggle them at runtime. Settings can also be
//! loaded once from a YAML file into a [`SideEffectsConfig`] snapshot.

pub mod loader;
pub mod switch;

pub use loader::SideEffectsConfig;
pub use switch::{parse_flag, EnvKillSwitch, KillSwitch, SharedKillSwitch};

/// Environment variable that disables all side effects when truthy
pub const DISABLED_ENV_VAR: &str = "SIDE_EFFECTS_DISABLED";

/// Environment variable that records instead of running side effects
pub const TEST_MODE_ENV_VAR: &str = "SIDE_EFFECTS_TEST_MODE";
