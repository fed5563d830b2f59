//! Accepted shapes of user code and their normalization into one canonical form.
//!
//! User code may or may not want the execution context, may be `async` or plain, and may or may
//! not produce a value. [Callable] names each of those shapes explicitly, and
//! [Callable::normalize] turns any of them into a [Canonical] callable which always takes the
//! context and always returns a boxed future.

mod canonical;

pub use canonical::{Canonical, CanonicalFn};

use futures::{future::BoxFuture, FutureExt};
use std::{fmt, future::Future};

/// The future every activity function is ultimately turned into
pub type BoxActFuture<R> = BoxFuture<'static, anyhow::Result<R>>;
/// An erased activity function which ignores the execution context
pub type NoArgFn<R> = Box<dyn Fn() -> BoxActFuture<R> + Send + Sync>;
/// An erased activity function which is handed the execution context
pub type ContextFn<C, R> = Box<dyn Fn(C) -> BoxActFuture<R> + Send + Sync>;

/// User code in one of the accepted shapes. Construct with the associated functions rather than
/// the variants directly; they accept both `async` and plain functions and take care of erasing
/// the concrete function and error types.
///
/// `C` is the execution context type handed to context-accepting functions and `T` is the value
/// produced by result-producing ones.
pub enum Callable<C, T = ()> {
    /// Takes nothing, produces nothing
    NoArgNoResult(NoArgFn<()>),
    /// Takes the context, produces nothing
    ContextNoResult(ContextFn<C, ()>),
    /// Takes nothing, produces a `T`
    NoArgWithResult(NoArgFn<T>),
    /// Takes the context, produces a `T`
    ContextWithResult(ContextFn<C, T>),
}

/// Discriminant of [Callable], without the function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableShape {
    /// See [Callable::NoArgNoResult]
    NoArgNoResult,
    /// See [Callable::ContextNoResult]
    ContextNoResult,
    /// See [Callable::NoArgWithResult]
    NoArgWithResult,
    /// See [Callable::ContextWithResult]
    ContextWithResult,
}

impl CallableShape {
    /// True for shapes whose functions produce a value
    pub fn produces_result(self) -> bool {
        matches!(
            self,
            CallableShape::NoArgWithResult | CallableShape::ContextWithResult
        )
    }

    /// True for shapes whose functions are handed the execution context
    pub fn takes_context(self) -> bool {
        matches!(
            self,
            CallableShape::ContextNoResult | CallableShape::ContextWithResult
        )
    }
}

impl<C> Callable<C, ()> {
    /// An async function taking no arguments, run for its side effects
    pub fn no_arg<F, Fut, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        Self::NoArgNoResult(Box::new(move || erase_fut(f())))
    }

    /// A plain function taking no arguments, run for its side effects
    pub fn no_arg_sync<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self::NoArgNoResult(Box::new(move || erase_ready(f())))
    }

    /// An async function taking the execution context, run for its side effects
    pub fn with_context<F, Fut, E>(f: F) -> Self
    where
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        Self::ContextNoResult(Box::new(move |ctx| erase_fut(f(ctx))))
    }

    /// A plain function taking the execution context, run for its side effects
    pub fn with_context_sync<F, E>(f: F) -> Self
    where
        F: Fn(C) -> Result<(), E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self::ContextNoResult(Box::new(move |ctx| erase_ready(f(ctx))))
    }
}

impl<C, T> Callable<C, T>
where
    T: Send + 'static,
{
    /// An async function taking no arguments and producing a `T`
    pub fn returning<F, Fut, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        Self::NoArgWithResult(Box::new(move || erase_fut(f())))
    }

    /// A plain function taking no arguments and producing a `T`
    pub fn returning_sync<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self::NoArgWithResult(Box::new(move || erase_ready(f())))
    }

    /// An async function taking the execution context and producing a `T`
    pub fn returning_with_context<F, Fut, E>(f: F) -> Self
    where
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        Self::ContextWithResult(Box::new(move |ctx| erase_fut(f(ctx))))
    }

    /// A plain function taking the execution context and producing a `T`
    pub fn returning_with_context_sync<F, E>(f: F) -> Self
    where
        F: Fn(C) -> Result<T, E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self::ContextWithResult(Box::new(move |ctx| erase_ready(f(ctx))))
    }
}

impl<C, T> Callable<C, T> {
    /// Which shape this callable is
    pub fn shape(&self) -> CallableShape {
        match self {
            Callable::NoArgNoResult(_) => CallableShape::NoArgNoResult,
            Callable::ContextNoResult(_) => CallableShape::ContextNoResult,
            Callable::NoArgWithResult(_) => CallableShape::NoArgWithResult,
            Callable::ContextWithResult(_) => CallableShape::ContextWithResult,
        }
    }

    /// True if the wrapped function produces a value which may be bound to an output
    pub fn produces_result(&self) -> bool {
        self.shape().produces_result()
    }

    /// Convert into the canonical `(context) -> future` form. The wrapped function is not
    /// invoked; functions which did not ask for the context simply never see it.
    pub fn normalize(self) -> Canonical<C, T>
    where
        T: 'static,
    {
        match self {
            Callable::NoArgNoResult(f) => Canonical::SideEffect(CanonicalFn::new(move |_| f())),
            Callable::ContextNoResult(f) => Canonical::SideEffect(CanonicalFn::from_boxed(f)),
            Callable::NoArgWithResult(f) => Canonical::Producing(CanonicalFn::new(move |_| f())),
            Callable::ContextWithResult(f) => Canonical::Producing(CanonicalFn::from_boxed(f)),
        }
    }
}

impl<C, T> fmt::Debug for Callable<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").field(&self.shape()).finish()
    }
}

fn erase_fut<Fut, R, E>(fut: Fut) -> BoxActFuture<R>
where
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    E: Into<anyhow::Error>,
{
    async move { fut.await.map_err(Into::<anyhow::Error>::into) }.boxed()
}

// The body has already run by the time this is called, so a plain function which fails hands
// back an already-failed future instead of returning early.
fn erase_ready<R, E>(res: Result<R, E>) -> BoxActFuture<R>
where
    R: Send + 'static,
    E: Into<anyhow::Error>,
{
    futures::future::ready(res.map_err(Into::<anyhow::Error>::into)).boxed()
}
