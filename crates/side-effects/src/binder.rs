//! Binding side-effect functions to event labels
//!
//! A [`SideEffectFn`] pairs a function with the metadata the registry keeps
//! about it: its name, the module it lives in and its documentation. Binding
//! never alters the function: the value handed back by
//! [`is_side_effect_of`] / [`SideEffectRegistry::register`] is the same
//! function and can still be called directly, e.g. from unit tests.
//!
//! # Examples
//!
//! ```ignore
//! use side_effects::{is_side_effect_of, side_effect};
//!
//! fn update_crm(profile: &Profile) -> anyhow::Result<()> {
//!     crm::push(profile)
//! }
//!
//! // at startup
//! let update_crm = is_side_effect_of("update_profile")
//!     .bind(side_effect!(update_crm).doc("Update CRM."));
//!
//! // still directly callable
//! update_crm.call(&profile)?;
//! ```

use std::{any::TypeId, borrow::Cow, fmt, sync::Arc};

use crate::{
    error::SideEffectsError,
    registry::{self, SideEffectRegistry},
    types::{Invocation, SideEffectBinding},
};

type BoxedFn<A, R> = Arc<dyn Fn(&A, &R) -> anyhow::Result<()> + Send + Sync>;

/// A side-effect function together with its registry metadata
///
/// `A` is the trigger argument type. `R` is the trigger return type for
/// functions built with [`SideEffectFn::with_return_value`], and `()` for
/// functions that only look at the arguments.
pub struct SideEffectFn<A, R = ()> {
    name: Cow<'static, str>,
    module: Option<Cow<'static, str>>,
    doc: Option<Cow<'static, str>>,
    func: BoxedFn<A, R>,
    receives_return_value: bool,
}

impl<A: 'static> SideEffectFn<A, ()> {
    /// Wrap a function that receives the trigger's arguments
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&A) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            module: None,
            doc: None,
            func: Arc::new(move |args: &A, _: &()| func(args)),
            receives_return_value: false,
        }
    }

    /// Call the function directly, exactly as if it were not bound
    pub fn call(&self, args: &A) -> anyhow::Result<()> {
        (self.func)(args, &())
    }
}

impl<A: 'static, R: 'static> SideEffectFn<A, R> {
    /// Wrap a function that also receives the trigger's return value
    pub fn with_return_value<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&A, &R) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            module: None,
            doc: None,
            func: Arc::new(func),
            receives_return_value: true,
        }
    }

    /// Attach documentation text
    pub fn doc(mut self, doc: impl Into<Cow<'static, str>>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Record the module the function is defined in
    pub fn module(mut self, module: impl Into<Cow<'static, str>>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Short function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation text, if any
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Call the function directly with arguments and a return value
    pub fn call_with(&self, args: &A, return_value: &R) -> anyhow::Result<()> {
        (self.func)(args, return_value)
    }

    pub(crate) fn to_binding(&self) -> SideEffectBinding {
        let func = Arc::clone(&self.func);
        let receives_return_value = self.receives_return_value;
        let name = self.qualified_name();

        let handler = move |invocation: &Invocation<'_>| {
            let args = invocation.args.downcast_ref::<A>().ok_or_else(|| {
                SideEffectsError::SignatureMismatch {
                    name: name.clone(),
                    expected: std::any::type_name::<A>(),
                    received: invocation.args_type,
                }
            })?;

            // Functions that ignore the return value were built with R = ().
            let unit: &dyn std::any::Any = &();
            let return_value = if receives_return_value {
                invocation.return_value
            } else {
                unit
            };
            let return_value = return_value.downcast_ref::<R>().ok_or_else(|| {
                SideEffectsError::SignatureMismatch {
                    name: name.clone(),
                    expected: std::any::type_name::<R>(),
                    received: invocation.return_type,
                }
            })?;

            func(args, return_value).map_err(|source| SideEffectsError::SideEffectFailed {
                name: name.clone(),
                source,
            })
        };

        SideEffectBinding {
            name: self.name.to_string(),
            module: self.module.as_ref().map(|m| m.to_string()),
            doc: self.doc.as_ref().map(|d| d.to_string()),
            args_type: std::any::type_name::<A>(),
            args_type_id: TypeId::of::<A>(),
            return_type: receives_return_value.then(std::any::type_name::<R>),
            handler: Arc::new(handler),
        }
    }

    fn qualified_name(&self) -> String {
        match &self.module {
            Some(module) => format!("{}::{}", module, self.name),
            None => self.name.to_string(),
        }
    }
}

impl<A, R> Clone for SideEffectFn<A, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            module: self.module.clone(),
            doc: self.doc.clone(),
            func: Arc::clone(&self.func),
            receives_return_value: self.receives_return_value,
        }
    }
}

impl<A, R> fmt::Debug for SideEffectFn<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffectFn")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("doc", &self.doc)
            .field("receives_return_value", &self.receives_return_value)
            .finish_non_exhaustive()
    }
}

/// Build a [`SideEffectFn`] named after a function path
///
/// The short name is the last path segment and the module is the caller's
/// `module_path!()`, so reports show fully-qualified names.
///
/// ```ignore
/// let f = side_effect!(update_crm).doc("Update CRM.");
/// let g = side_effect!(notify_handlers, with_return_value);
/// ```
#[macro_export]
macro_rules! side_effect {
    ($func:ident) => {
        $crate::SideEffectFn::new(stringify!($func), $func).module(module_path!())
    };
    ($func:ident, with_return_value) => {
        $crate::SideEffectFn::with_return_value(stringify!($func), $func).module(module_path!())
    };
}

/// Binds side-effect functions to one label of a registry
#[derive(Debug, Clone, Copy)]
pub struct Binder<'r, 'l> {
    registry: &'r SideEffectRegistry,
    label: &'l str,
}

impl<'r, 'l> Binder<'r, 'l> {
    pub(crate) fn new(registry: &'r SideEffectRegistry, label: &'l str) -> Self {
        Self { registry, label }
    }

    /// Register `side_effect` and hand it back unchanged
    pub fn bind<A: 'static, R: 'static>(&self, side_effect: SideEffectFn<A, R>) -> SideEffectFn<A, R> {
        self.registry.register(self.label, side_effect)
    }

    /// Label this binder registers under
    pub fn label(&self) -> &str {
        self.label
    }
}

/// Bind functions to `label` in the process-wide registry
pub fn is_side_effect_of(label: &str) -> Binder<'static, '_> {
    Binder::new(registry::global(), label)
}
