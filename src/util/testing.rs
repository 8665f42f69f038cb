//! Test logging setup shared by unit and integration tests

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Route `tracing` output through the test writer, once per test binary.
///
/// `RUST_LOG` selects the level; without it matcher traces (`debug`) are shown
/// for failing tests.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter);

        // another harness may already own the global dispatcher
        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            tracing::info!("test logging ready");
        }
    });
}
