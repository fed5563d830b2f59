use crate::OutputRef;

/// Errors returned by [crate::Activity::execute]
#[derive(thiserror::Error, Debug)]
pub enum ActivityError {
    /// The activity function itself failed. The error is exactly the one the function returned,
    /// display and source chain included.
    #[error(transparent)]
    Execution(anyhow::Error),
    /// The activity function completed, but the execution context refused the write of its
    /// result. Side effects of the function have already happened and cannot be rolled back from
    /// here.
    #[error("Activity completed but binding its result to `{output}` failed: {source:?}")]
    Binding {
        /// The slot the write was aimed at
        output: OutputRef,
        /// Error returned by the execution context
        source: anyhow::Error,
    },
    /// The activity function completed, but its result could not be turned into a payload, so
    /// nothing was written.
    #[error("Activity result could not be converted into a payload for `{output}`: {source}")]
    PayloadConversion {
        /// The slot the write was aimed at
        output: OutputRef,
        /// Underlying serialization error
        source: serde_json::Error,
    },
    /// The context's cancellation token fired before the activity function completed. Nothing
    /// was bound.
    #[error("Activity was cancelled before completing")]
    Cancelled,
}

impl ActivityError {
    /// True if the activity function ran to completion but its result was not recorded
    pub fn is_binding_failure(&self) -> bool {
        matches!(
            self,
            ActivityError::Binding { .. } | ActivityError::PayloadConversion { .. }
        )
    }

    /// Unwraps the error raised by the activity function. Returns `None` for failures that did
    /// not originate in the activity function.
    pub fn into_execution_error(self) -> Option<anyhow::Error> {
        match self {
            ActivityError::Execution(e) => Some(e),
            _ => None,
        }
    }
}
