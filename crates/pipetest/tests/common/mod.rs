//! Shared test utilities for pipetest integration tests.

pub mod plugins;

/// Set up tracing for a test binary; repeat calls are no-ops.
pub fn setup() {
    pipetest::logging::init();
}
