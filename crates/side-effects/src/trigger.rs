//! Trigger functions: functions whose success fires side effects
//!
//! A [`Trigger`] wraps a function with an event label. Each call runs the
//! function, decides from its return value whether it succeeded, and on
//! success dispatches the label with the call's arguments. The function's
//! return value is always handed back unchanged, and panics propagate
//! without firing anything.
//!
//! Success is decided by a predicate over the return value. The default is
//! [`Outcome::is_success`]: `Err` and HTTP responses with a 4xx/5xx status
//! count as failures, everything else as success.
//!
//! # Examples
//!
//! ```ignore
//! use side_effects::{has_side_effects, Trigger};
//!
//! let update_profile = has_side_effects("update_profile", |req: &ProfileUpdate| {
//!     store.save(req)
//! });
//! let saved = update_profile(&request)?;
//!
//! // custom success predicate
//! let checkout = Trigger::with_predicate("checkout", |order: &Order| order.is_paid())
//!     .wrap(place_order);
//! ```

use std::{fmt, marker::PhantomData, sync::Arc};

use tracing::debug;

use crate::{
    dispatcher::DispatchReport,
    registry::{self, SideEffectRegistry},
};

/// Classifies a trigger's return value as success or failure
///
/// Implement this for your own return types, or pass an explicit predicate
/// with [`Trigger::with_predicate`].
pub trait Outcome {
    /// Whether the trigger completed successfully
    fn is_success(&self) -> bool;
}

/// Return values that carry an HTTP status code
pub trait HttpStatus {
    /// Numeric status code, e.g. `404`
    fn status_code(&self) -> u16;
}

impl HttpStatus for http::StatusCode {
    fn status_code(&self) -> u16 {
        self.as_u16()
    }
}

impl<B> HttpStatus for http::Response<B> {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

/// False for 4xx and 5xx status codes, true otherwise
pub fn http_response_check<T: HttpStatus + ?Sized>(response: &T) -> bool {
    !(400..600).contains(&response.status_code())
}

/// Treat every return value as a success
pub fn always<R: ?Sized>(_: &R) -> bool {
    true
}

impl Outcome for http::StatusCode {
    fn is_success(&self) -> bool {
        http_response_check(self)
    }
}

impl<B> Outcome for http::Response<B> {
    fn is_success(&self) -> bool {
        http_response_check(self)
    }
}

impl<T: Outcome, E> Outcome for Result<T, E> {
    fn is_success(&self) -> bool {
        matches!(self, Ok(value) if value.is_success())
    }
}

impl<T> Outcome for Option<T> {
    fn is_success(&self) -> bool {
        true
    }
}

impl<T> Outcome for Vec<T> {
    fn is_success(&self) -> bool {
        true
    }
}

impl<T: Outcome + ?Sized> Outcome for Box<T> {
    fn is_success(&self) -> bool {
        (**self).is_success()
    }
}

macro_rules! always_succeeds {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Outcome for $ty {
                fn is_success(&self) -> bool {
                    true
                }
            }
        )*
    };
}

always_succeeds!(
    (), bool, char, String, &'static str, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128,
    isize, f32, f64,
);

type Predicate<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// A labelled trigger
///
/// `A` is the argument type handed to the wrapped function and to every
/// bound side effect; use a tuple for several arguments. `R` is the wrapped
/// function's return type.
///
/// Both must be `'static`, since bindings receive them as `&dyn Any`. Pass
/// owned data (`(Profile, String)`, not `(&Profile, &str)`); bindings still
/// only see a reference to it. Borrowed arguments can be wrapped in an
/// owning type such as `Arc<Profile>`.
pub struct Trigger<'r, A, R> {
    label: String,
    predicate: Predicate<R>,
    registry: &'r SideEffectRegistry,
    _args: PhantomData<fn(&A)>,
}

impl<A: 'static, R: Outcome + 'static> Trigger<'static, A, R> {
    /// Trigger for `label` using [`Outcome::is_success`] and the process-wide registry
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_predicate(label, |value: &R| value.is_success())
    }
}

impl<A: 'static, R: 'static> Trigger<'static, A, R> {
    /// Trigger for `label` with an explicit success predicate
    pub fn with_predicate<P>(label: impl Into<String>, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
            registry: registry::global(),
            _args: PhantomData,
        }
    }
}

impl<'r, A: 'static, R: 'static> Trigger<'r, A, R> {
    /// Replace the success predicate
    pub fn run_on_exit<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Dispatch through `registry` instead of the process-wide one
    pub fn registry<'s>(self, registry: &'s SideEffectRegistry) -> Trigger<'s, A, R> {
        Trigger {
            label: self.label,
            predicate: self.predicate,
            registry,
            _args: PhantomData,
        }
    }

    /// Event label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether `value` counts as a successful completion
    pub fn is_success(&self, value: &R) -> bool {
        (self.predicate)(value)
    }

    /// Run `func` with `args` and fire side effects if it succeeded
    pub fn call<F>(&self, func: F, args: &A) -> R
    where
        F: FnOnce(&A) -> R,
    {
        self.call_with_report(func, args).0
    }

    /// Like [`Trigger::call`], also returning the dispatch report
    ///
    /// The report is `None` when the predicate rejected the return value.
    pub fn call_with_report<F>(&self, func: F, args: &A) -> (R, Option<DispatchReport>)
    where
        F: FnOnce(&A) -> R,
    {
        let return_value = func(args);

        if !self.is_success(&return_value) {
            debug!(label = %self.label, "Trigger did not succeed, skipping side effects");
            return (return_value, None);
        }

        let report = self
            .registry
            .run_side_effects(&self.label, args, &return_value);
        (return_value, Some(report))
    }

    /// Wrap `func` so every call goes through this trigger
    pub fn wrap<F>(self, func: F) -> impl Fn(&A) -> R + 'r
    where
        F: Fn(&A) -> R + 'r,
    {
        move |args: &A| self.call(&func, args)
    }
}

impl<'r, A, R> Clone for Trigger<'r, A, R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
            registry: self.registry,
            _args: PhantomData,
        }
    }
}

impl<'r, A, R> fmt::Debug for Trigger<'r, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Wrap `func` as a trigger for `label` in the process-wide registry
pub fn has_side_effects<A, R, F>(label: impl Into<String>, func: F) -> impl Fn(&A) -> R
where
    A: 'static,
    R: Outcome + 'static,
    F: Fn(&A) -> R + 'static,
{
    Trigger::new(label).wrap(func)
}
