#![warn(missing_docs)] // error if there are missing docs

//! Adapts plain functions and closures into activities a workflow engine can execute.
//!
//! User code comes in many shapes: it may or may not need the execution context, may be `async`
//! or not, and may or may not produce a value. A [Callable] captures which of those shapes a
//! function has, and a [BoundActivity] normalizes it into a single `(context) -> future` form
//! while remembering which context slot, if any, its result should be written to.
//!
//! ```
//! use inline_activity::{BoundActivity, Callable, ExecutionContext, OutputRef, Payload};
//! use std::{collections::HashMap, sync::{Arc, Mutex}};
//!
//! #[derive(Clone, Default)]
//! struct Vars(Arc<Mutex<HashMap<String, Payload>>>);
//!
//! impl ExecutionContext for Vars {
//!     fn set(&self, output: &OutputRef, value: Payload) -> anyhow::Result<()> {
//!         self.0.lock().unwrap().insert(output.to_string(), value);
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let greet: BoundActivity<Vars, &str> = BoundActivity::from_callable(
//!     Callable::returning(|| async { Ok::<_, anyhow::Error>("hello") }),
//!     Some("greeting".into()),
//! );
//! let ctx = Vars::default();
//! greet.execute(&ctx).await.unwrap();
//! assert_eq!(ctx.0.lock().unwrap()["greeting"], "hello");
//! # }
//! ```

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate tracing;

mod activity;
pub mod callable;
mod context;
mod errors;
pub mod telemetry;

#[cfg(test)]
mod test_help;

pub use activity::{
    Activity, ActivityOptions, ActivityOptionsBuilder, ActivityOptionsBuilderError, BoundActivity,
    DEFAULT_ACTIVITY_NAME,
};
pub use callable::{Callable, CallableShape};
pub use context::{ExecutionContext, OutputRef, Payload};
pub use errors::ActivityError;
pub use tokio_util::sync::CancellationToken;
