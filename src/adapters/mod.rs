//! Concrete implementations of trait abstractions.
//!
//! Production adapters implementing the seams in `crate::traits` and
//! `crate::paging`, plus test doubles under [`mock`].
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`JsonPageSource`] - generic [`PageSource`](crate::paging::PageSource)
//!   for JSON cursor-paged endpoints, over any [`HttpClient`](crate::traits::HttpClient)
//!
//! # Mock Implementations
//!
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockPageSource`] - Scripted page-fetch outcomes
//! - [`mock::RecordingAnalytics`] - Captures analytics events

pub mod json_pages;
pub mod mock;
pub mod reqwest_http;

pub use json_pages::{JsonPage, JsonPageSource};
pub use mock::{MockHttpClient, MockPageSource, RecordingAnalytics};
pub use reqwest_http::ReqwestHttpClient;
