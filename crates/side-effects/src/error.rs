//! Error types for the side-effects registry
//!
//! Only side-effect failures and configuration problems are modelled here.
//! Failures of a trigger function are never wrapped: the trigger's own return
//! value (or panic) always reaches its caller unchanged.
//!
//! # Error Handling Patterns
//!
//! 1. **Side-effect failures**: a bound function returned an error or panicked.
//!    The failure is logged and recorded in the [`DispatchReport`], and the
//!    remaining functions bound to the same label still run.
//!
//! 2. **Signature mismatches**: a trigger dispatched arguments of a type the
//!    bound function was not registered for. Treated as a side-effect failure
//!    at dispatch time, and reported ahead of time by
//!    [`check_function_signatures`](crate::checks::check_function_signatures).
//!
//! 3. **Configuration errors**: a YAML settings file could not be read or parsed.
//!
//! [`DispatchReport`]: crate::dispatcher::DispatchReport

use thiserror::Error;

/// Errors that can occur in the side-effects registry
#[derive(Debug, Error)]
pub enum SideEffectsError {
    /// A bound side-effect function returned an error
    ///
    /// `name` is the fully-qualified name of the function; `source` is the
    /// error it returned. Side-effect backends are opaque, hence `anyhow`.
    #[error("Error running side_effect function '{name}': {source}")]
    SideEffectFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A bound side-effect function panicked
    ///
    /// The panic is caught so sibling functions for the same label still run.
    #[error("Side-effect function '{name}' panicked: {message}")]
    SideEffectPanicked { name: String, message: String },

    /// The dispatched arguments do not match the bound function's signature
    ///
    /// `expected` is the type the function was registered for and `received`
    /// the type the trigger supplied.
    #[error("Side-effect signature mismatch for function `{name}`: expected {expected}, received {received}")]
    SignatureMismatch {
        name: String,
        expected: &'static str,
        received: &'static str,
    },

    /// Invalid configuration
    ///
    /// Raised when a settings file holds values that cannot be interpreted.
    #[error("Invalid side-effects configuration: {0}")]
    InvalidConfiguration(String),

    /// YAML (de)serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    ///
    /// Raised by the reporting tool when rendering the raw label mapping.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SideEffectsError {
    /// Name of the side-effect function the error belongs to, if any
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::SideEffectFailed { name, .. }
            | Self::SideEffectPanicked { name, .. }
            | Self::SignatureMismatch { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Result type for side-effects operations
pub type Result<T> = std::result::Result<T, SideEffectsError>;
