//! Opt-in tracing setup for test binaries.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber honoring `RUST_LOG`, routing `log` records
/// through tracing. Safe to call from every test; repeat calls are ignored.
pub fn init() {
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
