//! Constraint values
//!
//! Every shorthand constraint (required, bounds, pattern, ...) is one of:
//! - a literal value,
//! - a function of the [`ValidationContext`] returning the effective value,
//! - either of the above paired with a custom message factory.

use std::sync::Arc;

use crate::context::ValidationContext;

pub type ConstraintFn<T> = Arc<dyn Fn(&ValidationContext<'_>) -> T + Send + Sync>;
pub type MessageFn = Arc<dyn Fn(&ValidationContext<'_>) -> String + Send + Sync>;

#[derive(Clone)]
pub enum Constraint<T> {
    Static(T),
    Dynamic(ConstraintFn<T>),
    WithMessage(Box<Constraint<T>>, MessageFn),
}

impl<T> From<T> for Constraint<T> {
    fn from(value: T) -> Self {
        Constraint::Static(value)
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Constraint::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Constraint::Dynamic(_) => f.write_str("Dynamic(..)"),
            Constraint::WithMessage(inner, _) => {
                f.debug_tuple("WithMessage").field(inner).field(&"..").finish()
            }
        }
    }
}

impl<T: Clone> Constraint<T> {
    pub fn dynamic(f: impl Fn(&ValidationContext<'_>) -> T + Send + Sync + 'static) -> Self {
        Constraint::Dynamic(Arc::new(f))
    }

    /// Pair a constraint with a custom message factory.
    pub fn with_message(
        constraint: impl Into<Constraint<T>>,
        message: impl Fn(&ValidationContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Constraint::WithMessage(Box::new(constraint.into()), Arc::new(message))
    }

    /// Attach a custom message factory to this constraint.
    pub fn message(
        self,
        message: impl Fn(&ValidationContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::with_message(self, message)
    }

    /// The effective constraint value in `ctx`.
    pub fn evaluate(&self, ctx: &ValidationContext<'_>) -> T {
        match self {
            Constraint::Static(value) => value.clone(),
            Constraint::Dynamic(f) => f(ctx),
            Constraint::WithMessage(inner, _) => inner.evaluate(ctx),
        }
    }

    pub fn custom_message(&self) -> Option<&MessageFn> {
        match self {
            Constraint::WithMessage(_, message) => Some(message),
            _ => None,
        }
    }
}
