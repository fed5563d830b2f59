use crate::OutputRef;

/// Name given to activities constructed without explicit options
pub const DEFAULT_ACTIVITY_NAME: &str = "inline";

/// Construction-time configuration of a [crate::BoundActivity]. Built with
/// [ActivityOptionsBuilder], which validates it.
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ActivityOptions {
    /// Identifies the activity in traces and logs. Must not be empty.
    #[builder(default = "DEFAULT_ACTIVITY_NAME.to_owned()")]
    pub(crate) name: String,
    /// Slot in the execution context the activity's result is written to after every successful
    /// execution. Only meaningful for result-producing activities; see
    /// [crate::BoundActivity::with_options]. Whether a slot name is acceptable is up to the
    /// context.
    #[builder(setter(into, strip_option), default)]
    pub(crate) output: Option<OutputRef>,
}

impl ActivityOptions {
    /// The activity's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slot results are written to, if any
    pub fn output(&self) -> Option<&OutputRef> {
        self.output.as_ref()
    }
}

impl ActivityOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err("`name` must not be empty".to_owned());
        }
        Ok(())
    }
}

impl Default for ActivityOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_ACTIVITY_NAME.to_owned(),
            output: None,
        }
    }
}

impl From<OutputRef> for ActivityOptions {
    fn from(output: OutputRef) -> Self {
        Self {
            output: Some(output),
            ..Default::default()
        }
    }
}
