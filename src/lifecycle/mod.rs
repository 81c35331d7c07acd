//! Owner lifecycle vocabulary and owner handles.
//!
//! This module defines the ordered lifecycle event vocabulary for the two
//! owner kinds (screens and nested views), the classification of terminal
//! events into transient vs permanent termination, and the [`Owner`] handle
//! through which a UI framework publishes an owner instance's events.
//!
//! - [`OwnerKind`] - Which lifecycle vocabulary an owner follows
//! - [`LifecycleEvent`] - One event in an owner's ordered lifecycle
//! - [`Termination`] - Transient vs permanent termination classification
//! - [`Owner`] - A live owner instance broadcasting its events

mod events;
mod owner;

pub use events::{LifecycleEvent, OwnerKind, Termination};
pub use owner::{LifecycleError, Owner, OwnerHandle};
