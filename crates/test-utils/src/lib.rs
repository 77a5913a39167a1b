//! Shared fixtures for cmdfeed's integration tests.

pub mod builders;
pub mod fake_executor;
pub mod tool;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Upper bound for a single test. Subprocess tests wait on real sleeps, so
/// this leaves room for a slow CI machine.
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

/// Install a per-test tracing subscriber.
///
/// Output goes through the test writer, so it only shows for failing tests.
/// The filter is read from `CMDFEED_LOG`, falling back to `RUST_LOG`, then
/// `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CMDFEED_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if `f` takes longer than [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_DEADLINE, f).await {
        Ok(value) => value,
        Err(_) => panic!("test did not finish within {TEST_DEADLINE:?}"),
    }
}
