//! Shared environment injected into constructed view-models.
//!
//! The registry hands every newly constructed view-model an
//! [`Environment`]: the transport client, the current user session, the
//! runtime configuration and the analytics sink. It is obtainable
//! synchronously and cheap to clone (collaborators are behind `Arc`s).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::{AnalyticsSink, HttpClient};

/// Session-level facts about the current user.
///
/// This is what "who is using the app right now" looks like to a
/// view-model; it does not carry any per-screen state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Stable id of the signed-in user, if any.
    pub user_id: Option<String>,
    /// Display name for the signed-in user.
    pub display_name: Option<String>,
    /// Bearer token attached to outgoing page requests.
    pub bearer_token: Option<String>,
}

impl SessionState {
    /// Create an empty (signed-out) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Runtime configuration for the view-model runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Base URL for paged-API requests.
    pub base_url: String,
    /// Default page size requested from paged endpoints.
    pub page_size: u32,
    /// Additional fetch attempts after a failed page load.
    pub retry_attempts: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            page_size: 20,
            retry_attempts: 2,
        }
    }
}

/// The shared dependency bundle.
#[derive(Clone)]
pub struct Environment {
    /// Paged-API transport.
    pub http: Arc<dyn HttpClient>,
    /// Current user/session state.
    pub session: SessionState,
    /// Runtime configuration.
    pub config: RuntimeConfig,
    /// Analytics event sink.
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl Environment {
    /// Assemble an environment from its collaborators.
    pub fn new(
        http: Arc<dyn HttpClient>,
        session: SessionState,
        config: RuntimeConfig,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            http,
            session,
            config,
            analytics,
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
