//! Identity-preserving view-model registry.
//!
//! A view-model outlives its momentarily-destroyed UI owner: the owner
//! persists an opaque [`IdentityToken`] across recreation (in a
//! [`SavedState`] envelope) and uses it to get the *same* live instance
//! back from the [`ViewModelStore`].
//!
//! The store is an explicitly constructed, dependency-injected arena - it
//! is never process-global state. All operations take `&mut self` (or
//! `&self` for reads), so the "external serialization required" contract
//! is enforced by the borrow checker rather than by documentation.
//!
//! Misuse of the store - destroying an instance it does not hold, or
//! fetching a live token as the wrong view-model kind - is a programming
//! error in the integration and panics, so such bugs surface early.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::env::Environment;
use crate::error::RegistryError;

/// Saved-state field under which the registry keeps the identity token.
const IDENTITY_KEY: &str = "moor.identity";

/// Opaque key that lets a recreated owner recover its pre-existing
/// view-model.
///
/// Minted once per view-model instance; never refers to more than one
/// live instance, and never reused after that instance is destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Mint a fresh, unique token.
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The token as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque key-value envelope an owner round-trips across recreation.
///
/// The registry reads and writes only its own identity field; everything
/// else in the envelope belongs to the owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedState {
    values: HashMap<String, serde_json::Value>,
}

impl SavedState {
    /// Create an empty envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Write a field.
    pub fn put(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    /// The identity token stored in this envelope, if any.
    pub fn identity(&self) -> Option<IdentityToken> {
        self.values
            .get(IDENTITY_KEY)
            .and_then(|v| v.as_str())
            .map(|s| IdentityToken(s.to_string()))
    }

    fn set_identity(&mut self, token: &IdentityToken) {
        self.values.insert(
            IDENTITY_KEY.to_string(),
            serde_json::Value::String(token.0.clone()),
        );
    }
}

/// A per-screen unit of business logic.
///
/// Implementors hold their pipelines behind an
/// [`AttachmentHub`](crate::binding::AttachmentHub) and honor two hooks:
///
/// - [`on_create`](Self::on_create) runs exactly once, right after the
///   instance is constructed and inserted into the store.
/// - [`on_destroy`](Self::on_destroy) runs exactly once, when the store
///   tears the instance down. It must terminate every owned subscription
///   and complete every hot stream the view-model exposes - closing the
///   hub does both.
pub trait ViewModel: Send + Sync + 'static {
    /// Creation hook. Invoked once per instance.
    fn on_create(&self) {}

    /// Destruction hook. Invoked once per instance.
    fn on_destroy(&self) {}
}

/// Compile-time factory for a view-model kind.
///
/// The store constructs instances through this trait, so each screen kind
/// registers its construction at compile time instead of being discovered
/// at runtime.
pub trait Construct: ViewModel + Sized {
    /// Construct an instance from the shared environment.
    ///
    /// Failure here is fatal to the screen being set up; there is no
    /// recovery path.
    fn construct(env: &Environment) -> Result<Self, RegistryError>;
}

/// Object-safe shim so the store can hold heterogeneous view-models and
/// still hand back concrete `Arc<V>`s.
trait StoredViewModel: ViewModel {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<V: ViewModel> StoredViewModel for V {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Keyed store mapping identity tokens to live view-model instances.
#[derive(Default)]
pub struct ViewModelStore {
    entries: HashMap<IdentityToken, Arc<dyn StoredViewModel>>,
}

impl ViewModelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the live instance for the identity saved in `saved`, or
    /// construct, store and return a new one.
    ///
    /// A fresh instance reuses the saved token when one is present (the
    /// process was restarted around a persisted envelope) and mints a new
    /// token otherwise. The creation hook runs only for fresh instances.
    ///
    /// # Panics
    ///
    /// If the saved token refers to a live instance of a different
    /// view-model kind - that is an integration bug, not a recoverable
    /// condition.
    pub fn fetch<V: Construct>(
        &mut self,
        env: &Environment,
        saved: Option<&SavedState>,
    ) -> Result<Arc<V>, RegistryError> {
        let saved_token = saved.and_then(SavedState::identity);

        if let Some(token) = &saved_token {
            if let Some(existing) = self.entries.get(token) {
                let instance = Arc::clone(existing).as_any_arc().downcast::<V>()
                    .unwrap_or_else(|_| {
                        panic!(
                            "registry misuse: token {} is live as a different kind than {}",
                            token,
                            type_name::<V>()
                        )
                    });
                debug!(token = %token, kind = type_name::<V>(), "view-model fetch hit");
                return Ok(instance);
            }
        }

        let token = saved_token.unwrap_or_else(IdentityToken::mint);
        let instance = Arc::new(V::construct(env)?);
        self.entries
            .insert(token.clone(), Arc::clone(&instance) as Arc<dyn StoredViewModel>);
        info!(token = %token, kind = type_name::<V>(), "view-model created");
        instance.on_create();
        Ok(instance)
    }

    /// Tear down an instance: run its destruction hook and remove its
    /// entry.
    ///
    /// # Panics
    ///
    /// If `instance` is not present in the store (never fetched here,
    /// or already destroyed).
    pub fn destroy<V: ViewModel>(&mut self, instance: &Arc<V>) {
        let token = self
            .token_of(instance)
            .unwrap_or_else(|| panic!("registry misuse: destroy of an instance not in the store"));
        info!(token = %token, kind = type_name::<V>(), "view-model destroyed");
        instance.on_destroy();
        self.entries.remove(&token);
    }

    /// Write the instance's identity token into `envelope`, so a future
    /// [`fetch`](Self::fetch) with that envelope returns the same
    /// instance.
    ///
    /// # Panics
    ///
    /// If `instance` is not present in the store.
    pub fn save<V: ViewModel>(&self, instance: &Arc<V>, envelope: &mut SavedState) {
        let token = self
            .token_of(instance)
            .unwrap_or_else(|| panic!("registry misuse: save of an instance not in the store"));
        envelope.set_identity(&token);
    }

    /// Whether the store holds a live instance for `token`.
    pub fn contains(&self, token: &IdentityToken) -> bool {
        self.entries.contains_key(token)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn token_of<V: ViewModel>(&self, instance: &Arc<V>) -> Option<IdentityToken> {
        let ptr = Arc::as_ptr(instance) as *const ();
        self.entries
            .iter()
            .find(|(_, stored)| Arc::as_ptr(stored) as *const () == ptr)
            .map(|(token, _)| token.clone())
    }
}

impl fmt::Debug for ViewModelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelStore")
            .field("live", &self.entries.len())
            .finish()
    }
}
