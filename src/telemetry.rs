//! Tracing setup for binaries and tests that host activities.

use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Filter used when `RUST_LOG` is unset or unparseable
pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing subscribers and output. Activities never call this themselves, it exists
/// so that engines and tests have an easy way to see what activities are doing. Safe to call
/// more than once; only the first call has any effect.
///
/// Filtering is controlled by the `RUST_LOG` environment variable.
pub fn tracing_init() {
    TRACING_INIT.get_or_init(|| install(fmt::layer().with_target(false)));
}

/// Filter built from `RUST_LOG`, falling back to [DEFAULT_FILTER]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install `output` behind [env_filter] as the global subscriber. Someone else may already have
/// installed one, which is fine.
pub fn install<L>(output: L)
where
    L: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::registry()
        .with(output.with_filter(env_filter()))
        .try_init();
}
