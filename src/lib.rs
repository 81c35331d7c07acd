//! Moor - a reactive view-model runtime.
//!
//! Moor keeps a per-screen unit of business logic (a "view-model") alive
//! across the destruction and recreation of its UI owner, guarantees that
//! every asynchronous pipeline the view-model starts is cancelled at the
//! correct - and only the correct - point of the owner's lifecycle, and
//! drives cursor-based incremental loading of remote paged data.
//!
//! The three pieces are deliberately coupled:
//!
//! - [`registry::ViewModelStore`] keeps view-model instances stable across
//!   owner churn, keyed by an opaque identity token the owner persists.
//! - [`binding::AttachmentHub`] binds pipelines to the lifecycle of
//!   whichever owner is *currently* attached, cancelling only on permanent
//!   termination - never on a pause, stop, or recreation.
//! - [`paging::Pager`] runs under the hub, so its in-flight fetches are
//!   structurally cancelled with everything else.
//!
//! Rendering, transport and event taxonomies stay outside: collaborators
//! come in through the trait seams in [`traits`] and [`paging`], with
//! production adapters and test doubles under [`adapters`].

pub mod adapters;
pub mod binding;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod paging;
pub mod prelude;
pub mod registry;
pub mod traits;
