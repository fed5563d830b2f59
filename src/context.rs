//! The boundary between activities and the engine's execution context.
//!
//! This crate never looks inside a context. It only needs a way to write a named result and,
//! optionally, a cancellation signal to honor while the activity body runs. Everything else a
//! context offers is for the wrapped functions themselves, which receive the concrete context
//! type.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Values written into a context's variable store
pub type Payload = serde_json::Value;

/// Names the slot in the execution context's variable store that an activity's result is written
/// to.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, derive_more::From,
)]
pub struct OutputRef(String);

impl OutputRef {
    /// Create a reference to the named slot
    pub fn new(slot: impl Into<String>) -> Self {
        Self(slot.into())
    }

    /// The slot name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OutputRef {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for OutputRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The capabilities an activity requires from the context it runs against.
///
/// Contexts are handed to activity functions by value, so implementors are expected to be cheap
/// handles (`Clone` over shared state). Implementations must serialize concurrent writers
/// themselves; an activity makes at most one call to [ExecutionContext::set] per execution.
#[cfg_attr(test, mockall::automock)]
pub trait ExecutionContext: Send + Sync {
    /// Write `value` into the slot named by `output`. What counts as an invalid slot, and how
    /// that is reported, is up to the implementation. Errors are returned to the engine as-is.
    fn set(&self, output: &OutputRef, value: Payload) -> anyhow::Result<()>;

    /// A token which, when cancelled, asks the running activity to stop. Contexts without
    /// cancellation support return `None`.
    fn cancellation_token(&self) -> Option<CancellationToken> {
        None
    }
}

impl<C> ExecutionContext for Arc<C>
where
    C: ExecutionContext + ?Sized,
{
    fn set(&self, output: &OutputRef, value: Payload) -> anyhow::Result<()> {
        (**self).set(output, value)
    }

    fn cancellation_token(&self) -> Option<CancellationToken> {
        (**self).cancellation_token()
    }
}
