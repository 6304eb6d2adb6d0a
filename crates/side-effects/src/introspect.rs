//! Read-only queries over the registry
//!
//! Used to generate documentation of what fires on each event, and to fail a
//! build when a bound function has no documentation.

use crate::{
    registry::{Events, LabelFilter, SideEffectRegistry},
    types::SideEffectBinding,
};

/// Marker shown in place of missing documentation
pub const MISSING_DOCSTRING: &str = "(no docstring)";

/// Split and strip documentation text into a list of lines
///
/// Returns `None` when the text is absent or blank.
pub fn docstring(doc: Option<&str>) -> Option<Vec<String>> {
    let doc = doc?.trim();
    if doc.is_empty() {
        return None;
    }
    Some(doc.lines().map(|line| line.trim().to_string()).collect())
}

/// Sort labels, and the bindings within each label by `key`
///
/// The sort is stable, so bindings with equal keys keep registration order.
pub fn sort_events<K, F>(events: Events, key: F) -> Events
where
    K: Ord,
    F: Fn(&SideEffectBinding) -> K,
{
    events
        .into_iter()
        .map(|(label, mut bindings)| {
            bindings.sort_by_key(|b| key(b));
            (label, bindings)
        })
        .collect()
}

/// Read-only view over a registry
#[derive(Debug, Clone, Copy)]
pub struct Introspector<'r> {
    registry: &'r SideEffectRegistry,
}

impl<'r> Introspector<'r> {
    /// Inspect `registry`
    pub fn new(registry: &'r SideEffectRegistry) -> Self {
        Self { registry }
    }

    /// Name and first documentation line of each function bound to `label`
    ///
    /// The documentation is `None` for functions without any.
    pub fn docs_for(&self, label: &str) -> Vec<(String, Option<String>)> {
        self.registry
            .lookup(label)
            .iter()
            .map(|binding| {
                let first_line = docstring(binding.doc()).and_then(|lines| lines.into_iter().next());
                (binding.name().to_string(), first_line)
            })
            .collect()
    }

    /// Fully-qualified names of undocumented functions under matching labels
    pub fn missing_docstrings(&self, filter: &LabelFilter) -> Vec<String> {
        self.registry
            .events(filter)
            .values()
            .flatten()
            .filter(|binding| !binding.has_doc())
            .map(SideEffectBinding::qualified_name)
            .collect()
    }

    /// Number of undocumented functions under matching labels
    pub fn missing_docstring_count(&self, filter: &LabelFilter) -> usize {
        self.missing_docstrings(filter).len()
    }
}

impl SideEffectRegistry {
    /// Read-only queries over this registry
    pub fn introspect(&self) -> Introspector<'_> {
        Introspector::new(self)
    }
}
