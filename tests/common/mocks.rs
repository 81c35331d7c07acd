//! Mock implementations for test fixtures.
//!
//! Re-exports the mock implementations from `moor::adapters::mock` and
//! provides test-specific environment builders on top of them.

#![allow(dead_code)]

pub use moor::adapters::mock::{
    MockHttpClient, MockOutcome, MockPageSource, MockResponse, RecordingAnalytics,
};

use std::sync::Arc;

use moor::env::{Environment, RuntimeConfig, SessionState};
use moor::traits::AnalyticsSink;

/// An environment over the mock HTTP client and the given analytics sink.
pub fn test_environment(analytics: Arc<dyn AnalyticsSink>) -> Environment {
    Environment::new(
        Arc::new(MockHttpClient::new()),
        SessionState::new(),
        RuntimeConfig::default(),
        analytics,
    )
}

/// An environment for tests that do not assert on analytics.
pub fn quiet_environment() -> Environment {
    test_environment(Arc::new(moor::traits::NullAnalytics))
}
