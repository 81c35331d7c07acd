//! Cursor-based pagination engine.
//!
//! A [`Pager`] turns a "load next page" trigger and a "start over" trigger
//! into an accumulated, deduplicated, retrying stream of result pages
//! fetched through an injected [`PageSource`].
//!
//! - [`PageSource`] - the per-screen network-call abstraction
//! - [`PagerConfig`] - accumulation, retry and emission policy
//! - [`Pager`] - the running engine: triggers in, `watch` outputs out
//!
//! A pager is always spawned under a view-model's
//! [`AttachmentHub`](crate::binding::AttachmentHub), so permanent lifecycle
//! termination structurally cancels its driver and any in-flight fetch.

mod config;
mod pager;
mod source;

pub use config::PagerConfig;
pub use pager::Pager;
pub use source::PageSource;
