use crate::context::MockExecutionContext;
use once_cell::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::fmt;

static TEST_TRACING: OnceCell<()> = OnceCell::new();

/// Tracing routed through the test harness, so output only shows for failing tests
fn test_tracing_init() {
    TEST_TRACING.get_or_init(|| {
        crate::telemetry::install(fmt::layer().with_target(false).with_test_writer())
    });
}

/// A mock context without cancellation support. Callers add their own `set` expectations.
pub(crate) fn mock_ctx() -> MockExecutionContext {
    test_tracing_init();
    let mut mock = MockExecutionContext::new();
    mock.expect_cancellation_token().returning(|| None);
    mock
}

/// A mock context whose cancellation is driven by `token`
pub(crate) fn mock_ctx_with_token(token: CancellationToken) -> MockExecutionContext {
    test_tracing_init();
    let mut mock = MockExecutionContext::new();
    mock.expect_cancellation_token()
        .returning(move || Some(token.clone()));
    mock
}
