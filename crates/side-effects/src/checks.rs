//! Startup consistency checks
//!
//! Every function bound to a label receives the same trigger arguments, so
//! they must all be registered for the same argument type. A mismatch would
//! only surface as a failed side effect at dispatch time; these checks let an
//! application catch it at startup.

use std::any::TypeId;

use serde::{Deserialize, Serialize};

use crate::registry::{LabelFilter, SideEffectRegistry};

/// Check id for labels whose functions take different argument types
pub const CHECK_ID_MULTIPLE_SIGNATURES: &str = "side_effects.W001";

/// Severity of a check message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    Warning,
    Error,
}

/// A problem found by a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckMessage {
    pub id: String,
    pub level: CheckLevel,
    pub msg: String,
    pub hint: Option<String>,
}

fn multiple_signatures(label: &str) -> CheckMessage {
    CheckMessage {
        id: CHECK_ID_MULTIPLE_SIGNATURES.to_string(),
        level: CheckLevel::Warning,
        msg: format!("Multiple function signatures for event: \"{}\"", label),
        hint: Some(format!(
            "Ensure that all functions bound with `is_side_effect_of(\"{}\")` accept identical arguments.",
            label
        )),
    }
}

/// Check that all functions bound to each label accept the same arguments
pub fn check_function_signatures(registry: &SideEffectRegistry) -> Vec<CheckMessage> {
    registry
        .events(&LabelFilter::All)
        .iter()
        .filter(|(_, bindings)| {
            let mut types = bindings.iter().map(|b| b.args_type_id());
            let first: Option<TypeId> = types.next();
            first.is_some_and(|first| types.any(|t| t != first))
        })
        .map(|(label, _)| multiple_signatures(label))
        .collect()
}
