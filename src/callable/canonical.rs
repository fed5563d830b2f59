use super::{BoxActFuture, ContextFn};
use std::fmt;

/// A normalized activity function: takes the context, returns a boxed future of its result.
pub struct CanonicalFn<C, R> {
    func: ContextFn<C, R>,
}

impl<C, R> CanonicalFn<C, R> {
    pub(crate) fn new<F>(func: F) -> Self
    where
        F: Fn(C) -> BoxActFuture<R> + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }

    pub(crate) fn from_boxed(func: ContextFn<C, R>) -> Self {
        Self { func }
    }

    /// Invoke the underlying function. Nothing runs until this is called, and each call runs the
    /// function exactly once.
    pub fn call(&self, ctx: C) -> BoxActFuture<R> {
        (self.func)(ctx)
    }
}

/// Output of [super::Callable::normalize]. Functions which produce a value stay distinguishable
/// from those that don't, since only the former may have their output bound.
pub enum Canonical<C, T> {
    /// Run only for its side effects
    SideEffect(CanonicalFn<C, ()>),
    /// Produces a `T`
    Producing(CanonicalFn<C, T>),
}

impl<C, T> Canonical<C, T> {
    /// True for [Canonical::Producing]
    pub fn produces_result(&self) -> bool {
        matches!(self, Canonical::Producing(_))
    }
}

impl<C, T> fmt::Debug for Canonical<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Canonical::SideEffect(_) => f.write_str("Canonical::SideEffect"),
            Canonical::Producing(_) => f.write_str("Canonical::Producing"),
        }
    }
}
