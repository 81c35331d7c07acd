//! Common test utilities for integration tests.
//!
//! Reusable fixtures and helpers for integration testing the runtime:
//! tracing initialisation and a ready-made environment over the mock
//! adapters.

pub mod mocks;

use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

/// Initialise tracing once across every integration test binary.
///
/// Respects `RUST_LOG`; silent by default.
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
