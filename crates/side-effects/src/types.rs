//! Core data types for the side-effects registry
//!
//! A [`SideEffectBinding`] is what the registry stores for every function
//! bound to an event label. Bindings hold a type-erased handle to the
//! original function so one process-wide registry can serve triggers with
//! unrelated argument types.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SideEffectsError};

/// Type-erased side-effect handler stored by the registry
pub(crate) type ErasedHandler = dyn Fn(&Invocation<'_>) -> Result<()> + Send + Sync;

/// Arguments and return value of a trigger call, as seen by a binding
///
/// The type names travel alongside the erased values so a signature mismatch
/// can report what was actually received.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub(crate) args: &'a dyn Any,
    pub(crate) args_type: &'static str,
    pub(crate) return_value: &'a dyn Any,
    pub(crate) return_type: &'static str,
}

impl<'a> Invocation<'a> {
    /// Capture the arguments and return value of a trigger call
    ///
    /// Both types must be `'static`; borrowed trigger arguments are not
    /// supported.
    pub fn new<A: Any, R: Any>(args: &'a A, return_value: &'a R) -> Self {
        Self {
            args,
            args_type: std::any::type_name::<A>(),
            return_value,
            return_type: std::any::type_name::<R>(),
        }
    }

    /// Type name of the trigger arguments
    pub fn args_type(&self) -> &'static str {
        self.args_type
    }

    /// Type name of the trigger return value
    pub fn return_type(&self) -> &'static str {
        self.return_type
    }
}

/// A function bound to an event label
///
/// Cloning a binding is cheap: the handler is reference counted and is
/// never copied or wrapped with extra behaviour.
#[derive(Clone)]
pub struct SideEffectBinding {
    pub(crate) name: String,
    pub(crate) module: Option<String>,
    pub(crate) doc: Option<String>,
    pub(crate) args_type: &'static str,
    pub(crate) args_type_id: TypeId,
    pub(crate) return_type: Option<&'static str>,
    pub(crate) handler: Arc<ErasedHandler>,
}

impl SideEffectBinding {
    /// Short function name, e.g. `update_crm`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified function name, e.g. `app::crm::update_crm`
    pub fn qualified_name(&self) -> String {
        match &self.module {
            Some(module) => format!("{}::{}", module, self.name),
            None => self.name.clone(),
        }
    }

    /// Documentation text captured at registration time
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Whether the binding has usable documentation
    pub fn has_doc(&self) -> bool {
        crate::introspect::docstring(self.doc()).is_some()
    }

    /// Type name of the arguments the function accepts
    pub fn args_type(&self) -> &'static str {
        self.args_type
    }

    /// `TypeId` of the arguments the function accepts
    pub fn args_type_id(&self) -> TypeId {
        self.args_type_id
    }

    /// Type name of the trigger return value, when the function receives it
    pub fn return_type(&self) -> Option<&'static str> {
        self.return_type
    }

    /// Invoke the bound function
    pub fn invoke(&self, invocation: &Invocation<'_>) -> Result<()> {
        (self.handler)(invocation)
    }

    /// Serializable view of this binding
    pub fn info(&self, label: &str) -> BindingInfo {
        BindingInfo {
            label: label.to_string(),
            name: self.name.clone(),
            qualified_name: self.qualified_name(),
            doc: self.doc.clone(),
            args_type: self.args_type.to_string(),
        }
    }
}

impl fmt::Debug for SideEffectBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffectBinding")
            .field("name", &self.qualified_name())
            .field("doc", &self.doc)
            .field("args_type", &self.args_type)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// Read-only description of a binding, used by reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingInfo {
    /// Event label the function is bound to
    pub label: String,

    /// Short function name
    pub name: String,

    /// Fully-qualified function name
    pub qualified_name: String,

    /// Documentation text, if any
    pub doc: Option<String>,

    /// Type name of the accepted arguments
    pub args_type: String,
}

/// Labels that fired (or would have fired) while side effects were suppressed
///
/// Handles are shared: the log stays readable after the suppression scope
/// that filled it has ended.
#[derive(Debug, Clone, Default)]
pub struct FiredEvents {
    labels: Arc<Mutex<Vec<String>>>,
}

impl FiredEvents {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both handles refer to the same log
    pub(crate) fn same_log(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.labels, &other.labels)
    }

    pub(crate) fn push(&self, label: &str) {
        self.labels.lock().push(label.to_string());
    }

    /// Snapshot of the recorded labels, in firing order
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().clone()
    }

    /// Whether `label` was recorded at least once
    pub fn contains(&self, label: &str) -> bool {
        self.labels.lock().iter().any(|l| l == label)
    }

    /// Number of recorded labels
    pub fn len(&self) -> usize {
        self.labels.lock().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.labels.lock().is_empty()
    }
}
