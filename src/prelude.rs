//! Prelude module for convenient imports.
//!
//! Re-exports the types most integrations touch:
//!
//! ```ignore
//! use moor::prelude::*;
//! ```

// Registry
pub use crate::registry::{Construct, IdentityToken, SavedState, ViewModel, ViewModelStore};

// Lifecycle + binding
pub use crate::binding::{AttachmentHub, TerminationSignal};
pub use crate::lifecycle::{LifecycleEvent, Owner, OwnerHandle, OwnerKind, Termination};

// Pagination
pub use crate::paging::{PageSource, Pager, PagerConfig};

// Environment and errors
pub use crate::env::{Environment, RuntimeConfig, SessionState};
pub use crate::error::{ErrorCategory, PageError, RegistryError};
