//! Mock implementations for testing.
//!
//! Test doubles for every trait seam, so unit and integration tests run
//! without network dependencies.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockPageSource`] - Page source with scripted per-call outcomes
//! - [`RecordingAnalytics`] - Analytics sink capturing recorded events

pub mod analytics;
pub mod http;
pub mod pages;

pub use analytics::RecordingAnalytics;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use pages::{MockOutcome, MockPage, MockPageSource, RecordedFetch};
