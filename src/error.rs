//! Core error types.
//!
//! Two failure domains exist in this runtime:
//!
//! - **Registry errors** - a requested view-model kind could not be
//!   constructed. Fatal to that screen's startup; propagates to the caller
//!   of the registry operation. (Registry *misuse* - destroying an unknown
//!   instance, a kind mismatch on a live token - is a programming error
//!   and panics instead.)
//! - **Page errors** - a page fetch failed. Transient failures are retried
//!   inside the pagination engine; exhausted failures are swallowed on the
//!   data path and only visible on the opt-in error channel.

use crate::traits::HttpError;

/// Coarse classification used for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connectivity, timeouts, server-side failures. Usually retryable.
    Network,
    /// Programming errors on the caller's side. Not retryable.
    Client,
    /// Runtime/environment failures. Sometimes retryable.
    System,
}

impl ErrorCategory {
    /// Whether errors of this category are worth retrying by default.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorCategory::Network)
    }
}

/// Errors from view-model registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// The requested view-model kind could not be constructed from the
    /// shared environment. There is no recovery path; a screen cannot
    /// function without its logic unit.
    Construction {
        /// Type name of the view-model kind.
        kind: &'static str,
        message: String,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Construction { kind, message } => {
                write!(f, "failed to construct view-model {}: {}", kind, message)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

impl RegistryError {
    /// Registry errors are never retryable.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Client
    }
}

/// Errors from a single page fetch.
#[derive(Debug, Clone)]
pub enum PageError {
    /// The HTTP transport failed.
    Http(HttpError),
    /// The page source failed for a non-transport reason (decode error,
    /// contract violation in the payload).
    Source { message: String },
    /// All attempts for one fetch were used up. Carries the total number
    /// of attempts made and the final error.
    Exhausted {
        attempts: u32,
        last: Box<PageError>,
    },
}

impl PageError {
    /// Build a source error from any displayable cause.
    pub fn source(message: impl Into<String>) -> Self {
        PageError::Source {
            message: message.into(),
        }
    }

    /// Whether a retry might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            PageError::Http(e) => e.is_retryable(),
            PageError::Source { .. } => false,
            PageError::Exhausted { .. } => false,
        }
    }

    /// Coarse category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            PageError::Http(_) => ErrorCategory::Network,
            PageError::Source { .. } => ErrorCategory::System,
            PageError::Exhausted { last, .. } => last.category(),
        }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::Http(e) => write!(f, "page fetch failed: {}", e),
            PageError::Source { message } => write!(f, "page source error: {}", message),
            PageError::Exhausted { attempts, last } => {
                write!(f, "page fetch gave up after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl std::error::Error for PageError {}

impl From<HttpError> for PageError {
    fn from(e: HttpError) -> Self {
        PageError::Http(e)
    }
}
