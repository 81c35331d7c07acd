//! Trait abstractions for dependency injection and testability.
//!
//! Everything this runtime talks to from the outside world comes in
//! through a trait seam, so tests can substitute mocks and the core never
//! learns a wire protocol.
//!
//! # Traits
//!
//! - [`HttpClient`] - paged-API transport (GET with query parameters)
//! - [`AnalyticsSink`] - analytics event recording
//!
//! The page-fetch seam itself ([`crate::paging::PageSource`]) lives with
//! the pagination engine it feeds.

pub mod analytics;
pub mod http;

pub use analytics::{AnalyticsEvent, AnalyticsSink, NullAnalytics};
pub use http::{Headers, HttpClient, HttpError, Query, Response};
