//! Analytics sink abstraction.
//!
//! View-models report product events through an injected sink; this core
//! never decides what the event taxonomy is, it only carries the seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One analytics event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsEvent {
    /// Event name, e.g. `"screen_opened"`.
    pub name: String,
    /// Arbitrary JSON properties.
    pub properties: serde_json::Value,
    /// When the event happened.
    pub at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Create an event with no properties, stamped now.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: serde_json::Value::Null,
            at: Utc::now(),
        }
    }

    /// Attach properties to the event.
    pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
        self.properties = properties;
        self
    }
}

/// Trait for analytics event recording.
///
/// Recording is fire-and-forget and must not block; implementations that
/// ship events over the network should buffer internally.
pub trait AnalyticsSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: AnalyticsEvent);
}

/// A sink that drops every event. Useful as a default and in tests that
/// do not assert on analytics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAnalytics;

impl AnalyticsSink for NullAnalytics {
    fn record(&self, _event: AnalyticsEvent) {}
}
