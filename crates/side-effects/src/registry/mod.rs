//! Registry of side-effect functions
//!
//! The registry maps event labels to the ordered list of functions bound to
//! them. It is populated once at startup (every binding is appended in
//! registration order) and read on every trigger call afterwards.
//!
//! Unknown labels are a normal state: a trigger may be declared before any
//! side effect is bound to it, so [`SideEffectRegistry::lookup`] returns an
//! empty list rather than an error.
//!
//! # Examples
//!
//! ```ignore
//! use side_effects::{side_effect, SideEffectRegistry};
//!
//! let registry = SideEffectRegistry::new();
//! registry.register("update_profile", side_effect!(update_crm).doc("Update CRM."));
//! registry.register("update_profile", side_effect!(notify_handlers));
//!
//! assert_eq!(registry.lookup("update_profile").len(), 2);
//! assert!(registry.lookup("unknown").is_empty());
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    binder::{Binder, SideEffectFn},
    config::{EnvKillSwitch, KillSwitch},
    types::{BindingInfo, SideEffectBinding},
};

/// Labels mapped to their bindings, ordered by label
pub type Events = BTreeMap<String, Vec<SideEffectBinding>>;

/// Which labels a query covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelFilter {
    /// Every registered label
    #[default]
    All,

    /// A single label, matched exactly
    Exact(String),

    /// Labels containing the given substring
    Contains(String),
}

impl LabelFilter {
    /// Whether `label` is covered by this filter
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(value) => label == value,
            Self::Contains(value) => label.contains(value.as_str()),
        }
    }
}

/// Registry of side-effect functions keyed by event label
///
/// Reads and writes go through a `parking_lot::RwLock`, so concurrent
/// dispatch is safe and registration cannot fail on a poisoned lock.
pub struct SideEffectRegistry {
    bindings: RwLock<Events>,
    kill_switch: Arc<dyn KillSwitch>,
}

impl SideEffectRegistry {
    /// Create an empty registry reading the kill switch from the environment
    pub fn new() -> Self {
        Self::with_kill_switch(Arc::new(EnvKillSwitch))
    }

    /// Create an empty registry with a custom kill switch
    pub fn with_kill_switch(kill_switch: Arc<dyn KillSwitch>) -> Self {
        Self {
            bindings: RwLock::new(BTreeMap::new()),
            kill_switch,
        }
    }

    /// Kill switch consulted on every dispatch
    pub fn kill_switch(&self) -> &dyn KillSwitch {
        self.kill_switch.as_ref()
    }

    /// Bind functions to `label` in this registry
    pub fn is_side_effect_of<'l>(&self, label: &'l str) -> Binder<'_, 'l> {
        Binder::new(self, label)
    }

    /// Append `side_effect` to the bindings of `label` and hand it back
    ///
    /// Registering the same function twice under one label produces two
    /// bindings, and the function runs twice per dispatch.
    pub fn register<A: 'static, R: 'static>(
        &self,
        label: impl Into<String>,
        side_effect: SideEffectFn<A, R>,
    ) -> SideEffectFn<A, R> {
        self.register_binding(label, side_effect.to_binding());
        side_effect
    }

    /// Append an already-built binding to `label`
    pub fn register_binding(&self, label: impl Into<String>, binding: SideEffectBinding) {
        let label = label.into();
        debug!(
            label = %label,
            function = %binding.qualified_name(),
            "Registering side-effect function"
        );
        self.bindings.write().entry(label).or_default().push(binding);
    }

    /// Bindings for `label`, in registration order
    pub fn lookup(&self, label: &str) -> Vec<SideEffectBinding> {
        self.bindings.read().get(label).cloned().unwrap_or_default()
    }

    /// Whether a function with this fully-qualified name is bound to `label`
    pub fn contains(&self, label: &str, qualified_name: &str) -> bool {
        self.bindings
            .read()
            .get(label)
            .is_some_and(|bindings| bindings.iter().any(|b| b.qualified_name() == qualified_name))
    }

    /// Every label with at least one binding
    pub fn all_labels(&self) -> BTreeSet<String> {
        self.bindings.read().keys().cloned().collect()
    }

    /// Labels containing `substring`, sorted
    pub fn labels_matching(&self, substring: &str) -> Vec<String> {
        self.bindings
            .read()
            .keys()
            .filter(|label| label.contains(substring))
            .cloned()
            .collect()
    }

    /// Labels and bindings selected by `filter`
    pub fn events(&self, filter: &LabelFilter) -> Events {
        self.bindings
            .read()
            .iter()
            .filter(|(label, _)| filter.matches(label))
            .map(|(label, bindings)| (label.clone(), bindings.clone()))
            .collect()
    }

    /// Filter by label (exact match)
    pub fn by_label(&self, label: &str) -> Events {
        self.events(&LabelFilter::Exact(label.to_string()))
    }

    /// Filter by label (contains string)
    pub fn by_label_contains(&self, substring: &str) -> Events {
        self.events(&LabelFilter::Contains(substring.to_string()))
    }

    /// Serializable descriptions of the bindings selected by `filter`
    pub fn binding_infos(&self, filter: &LabelFilter) -> Vec<BindingInfo> {
        self.events(filter)
            .iter()
            .flat_map(|(label, bindings)| bindings.iter().map(move |b| b.info(label)))
            .collect()
    }

    /// Total number of bindings across all labels
    pub fn len(&self) -> usize {
        self.bindings.read().values().map(Vec::len).sum()
    }

    /// Whether no function is bound to any label
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Remove every binding
    pub fn clear(&self) {
        self.bindings.write().clear();
    }
}

impl Default for SideEffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SideEffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffectRegistry")
            .field("bindings", &*self.bindings.read())
            .finish_non_exhaustive()
    }
}

static GLOBAL: Lazy<SideEffectRegistry> = Lazy::new(SideEffectRegistry::new);

/// The process-wide registry
pub fn global() -> &'static SideEffectRegistry {
    &GLOBAL
}

/// Add a side-effect function to the process-wide registry
pub fn register_side_effect<A: 'static, R: 'static>(
    label: impl Into<String>,
    side_effect: SideEffectFn<A, R>,
) -> SideEffectFn<A, R> {
    global().register(label, side_effect)
}
