//! Collaborator contracts for location and place search.
//!
//! # Responsibility
//! - Describe what the core consumes from platform location services and the
//!   places search API.
//! - Keep SDK and network details outside core.
//!
//! # Invariants
//! - Provider failures are reported as `ProviderError`, never panics.
//! - Callers in core degrade provider failures to empty results.

pub mod location;
pub mod search;

pub use location::{LocationHandler, LocationProvider};
pub use search::{PlacePhoto, PlaceSearchProvider, PlaceSummary};

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error envelope returned by collaborator providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub provider_id: String,
    /// Stable machine-readable code, e.g. `network_unavailable`.
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(
        provider_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} (retryable={})",
            self.provider_id, self.code, self.message, self.retryable
        )
    }
}

impl Error for ProviderError {}
