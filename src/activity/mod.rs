mod options;

pub use options::{
    ActivityOptions, ActivityOptionsBuilder, ActivityOptionsBuilderError, DEFAULT_ACTIVITY_NAME,
};

use crate::{
    callable::{BoxActFuture, Callable, Canonical},
    ActivityError, ExecutionContext, OutputRef,
};
use serde::Serialize;
use std::{fmt, sync::Arc};

/// Anything the workflow engine can execute as a single step.
///
/// The engine owns sequencing, retries and timeouts. An activity only runs its body against the
/// context it is handed, and reports how that went.
#[async_trait::async_trait]
pub trait Activity<C>: Send + Sync {
    /// Run the activity once against `ctx`. Resolves only after the body, and any write of its
    /// result into the context, have finished.
    async fn execute(&self, ctx: &C) -> Result<(), ActivityError>;
}

#[async_trait::async_trait]
impl<C, A> Activity<C> for Box<A>
where
    A: Activity<C> + ?Sized,
    C: Sync,
{
    async fn execute(&self, ctx: &C) -> Result<(), ActivityError> {
        (**self).execute(ctx).await
    }
}

#[async_trait::async_trait]
impl<C, A> Activity<C> for Arc<A>
where
    A: Activity<C> + ?Sized,
    C: Sync,
{
    async fn execute(&self, ctx: &C) -> Result<(), ActivityError> {
        (**self).execute(ctx).await
    }
}

/// A user function adapted into an [Activity], along with the optional context slot its result
/// gets written to.
///
/// Immutable once built and holds no per-execution state, so the same instance can be executed
/// any number of times, including concurrently, against different contexts.
pub struct BoundActivity<C, T = ()> {
    canonical: Canonical<C, T>,
    options: ActivityOptions,
}

impl<C, T> BoundActivity<C, T>
where
    T: 'static,
{
    /// Adapt `callable`, writing its result to `output` (if provided) after each successful
    /// execution.
    pub fn from_callable(callable: Callable<C, T>, output: Option<OutputRef>) -> Self {
        Self::with_options(
            callable,
            ActivityOptions {
                output,
                ..Default::default()
            },
        )
    }

    /// Adapt `callable` using the provided options.
    ///
    /// An output slot given for a callable which produces no value is dropped here; such an
    /// activity never writes to the context.
    pub fn with_options(callable: Callable<C, T>, mut options: ActivityOptions) -> Self {
        if !callable.produces_result() {
            if let Some(output) = options.output.take() {
                debug!(activity = %options.name, %output,
                       "Ignoring output binding for activity which produces no result");
            }
        }
        Self {
            canonical: callable.normalize(),
            options,
        }
    }

    /// Name of this activity, as used in traces
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// The slot this activity's result is written to, if any
    pub fn output(&self) -> Option<&OutputRef> {
        self.options.output.as_ref()
    }

    /// True if the wrapped function produces a value
    pub fn produces_result(&self) -> bool {
        self.canonical.produces_result()
    }
}

impl<C, T> BoundActivity<C, T>
where
    C: ExecutionContext + Clone,
    T: Serialize + Send,
{
    /// Run the wrapped function once against `ctx`, then write its result to the bound output
    /// slot if there is one.
    ///
    /// Errors from the function are returned as [ActivityError::Execution] without modification,
    /// and nothing is written. A failed write after a successful run is reported as
    /// [ActivityError::Binding]; the function's side effects are not undone in that case.
    #[instrument(name = "execute_activity", skip_all,
                 fields(activity = %self.options.name, output = ?self.options.output))]
    pub async fn execute(&self, ctx: &C) -> Result<(), ActivityError> {
        debug!("Executing activity");
        match &self.canonical {
            Canonical::SideEffect(f) => {
                run_cancellable(ctx, || f.call(ctx.clone())).await?;
            }
            Canonical::Producing(f) => {
                let result = run_cancellable(ctx, || f.call(ctx.clone())).await?;
                if let Some(output) = &self.options.output {
                    bind_result(ctx, output, &result)?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<C, T> Activity<C> for BoundActivity<C, T>
where
    C: ExecutionContext + Clone,
    T: Serialize + Send,
{
    async fn execute(&self, ctx: &C) -> Result<(), ActivityError> {
        BoundActivity::execute(self, ctx).await
    }
}

impl<C, T> From<Callable<C, T>> for BoundActivity<C, T>
where
    T: 'static,
{
    fn from(callable: Callable<C, T>) -> Self {
        Self::from_callable(callable, None)
    }
}

impl<C, T> fmt::Debug for BoundActivity<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundActivity")
            .field("canonical", &self.canonical)
            .field("options", &self.options)
            .finish()
    }
}

/// Start the activity function unless the context has already been cancelled, then race it
/// against cancellation. Losing the race drops the function's future.
async fn run_cancellable<C, R>(
    ctx: &C,
    start: impl FnOnce() -> BoxActFuture<R>,
) -> Result<R, ActivityError>
where
    C: ExecutionContext,
{
    let res = match ctx.cancellation_token() {
        Some(token) => {
            if token.is_cancelled() {
                warn!("Activity cancelled before it started");
                return Err(ActivityError::Cancelled);
            }
            let fut = start();
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    warn!("Activity cancelled while running");
                    return Err(ActivityError::Cancelled);
                }
                r = fut => r,
            }
        }
        None => start().await,
    };
    res.map_err(ActivityError::Execution)
}

fn bind_result<C, T>(ctx: &C, output: &OutputRef, result: &T) -> Result<(), ActivityError>
where
    C: ExecutionContext,
    T: Serialize,
{
    let payload =
        serde_json::to_value(result).map_err(|source| ActivityError::PayloadConversion {
            output: output.clone(),
            source,
        })?;
    ctx.set(output, payload)
        .map_err(|source| ActivityError::Binding {
            output: output.clone(),
            source,
        })?;
    debug!(%output, "Bound activity result");
    Ok(())
}
