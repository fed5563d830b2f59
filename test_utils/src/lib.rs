//! Execution contexts for exercising activities in tests.

use anyhow::anyhow;
use dashmap::DashMap;
use inline_activity::{telemetry, CancellationToken, ExecutionContext, OutputRef, Payload};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Like [telemetry::tracing_init], but writes through the test harness so output is captured
/// per test.
pub fn tracing_init() {
    TRACING_INIT.get_or_init(|| {
        telemetry::install(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_test_writer(),
        )
    });
}

/// An in-memory variable store. Clones share the same variables, so a clone can be handed to an
/// activity while the test keeps one to inspect afterwards.
#[derive(Clone, Debug, Default)]
pub struct MemoryContext {
    vars: Arc<DashMap<OutputRef, Payload>>,
    writes: Arc<Mutex<Vec<OutputRef>>>,
    set_calls: Arc<AtomicUsize>,
    read_only: Arc<HashSet<OutputRef>>,
    cancellation: Option<CancellationToken>,
}

impl MemoryContext {
    /// Create an empty context without cancellation support
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty context which reports `token` as its cancellation token
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: Some(token),
            ..Default::default()
        }
    }

    /// Create an empty context which refuses writes to any of `slots`
    pub fn with_read_only<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OutputRef>,
    {
        Self {
            read_only: Arc::new(slots.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    /// Seed a variable, as an earlier workflow step would have. Not counted as a write.
    pub fn insert(&self, slot: impl Into<OutputRef>, value: Payload) {
        self.vars.insert(slot.into(), value);
    }

    /// The raw value in `slot`, if any
    pub fn get(&self, slot: impl Into<OutputRef>) -> Option<Payload> {
        let slot: OutputRef = slot.into();
        self.vars.get(&slot).map(|v| v.value().clone())
    }

    /// The value in `slot` deserialized as `T`. Panics if the slot is empty or has the wrong
    /// type, which is what tests want.
    pub fn get_as<T: DeserializeOwned>(&self, slot: impl Into<OutputRef>) -> T {
        let slot = slot.into();
        let val = self
            .get(slot.clone())
            .unwrap_or_else(|| panic!("Slot `{}` was never written", slot));
        serde_json::from_value(val)
            .unwrap_or_else(|e| panic!("Slot `{}` holds an unexpected type: {}", slot, e))
    }

    /// Number of times [ExecutionContext::set] has been called, including refused writes
    pub fn set_count(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    /// Slots successfully written through [ExecutionContext::set], in order
    pub fn writes(&self) -> Vec<OutputRef> {
        self.writes.lock().clone()
    }
}

impl ExecutionContext for MemoryContext {
    fn set(&self, output: &OutputRef, value: Payload) -> anyhow::Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.read_only.contains(output) {
            return Err(anyhow!("Slot `{}` is read only", output));
        }
        self.vars.insert(output.clone(), value);
        self.writes.lock().push(output.clone());
        Ok(())
    }

    fn cancellation_token(&self) -> Option<CancellationToken> {
        self.cancellation.clone()
    }
}
