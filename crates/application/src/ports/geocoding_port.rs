//! Geocoding port
//!
//! Defines the interface for address autocomplete and one-shot search.
//! Adapters walk an ordered provider list and use the first configured one.

use async_trait::async_trait;
use domain::{SearchBias, Suggestion};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use thiserror::Error;

/// Suggestions returned by a single provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSuggestions {
    /// Provider that answered
    pub provider: String,
    /// Normalized entries, possibly empty
    pub suggestions: Vec<Suggestion>,
}

/// Why a lookup produced no suggestions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No provider is configured for this kind of lookup
    #[error("No geocoding provider is configured")]
    NotConfigured,

    /// Provider answered 429
    #[error("{provider}: rate limited")]
    RateLimited { provider: String },

    /// Provider answered with a payload that could not be read
    #[error("{provider}: malformed response: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Connection failure, timeout or non-2xx status
    #[error("{provider}: {message}")]
    Transport { provider: String, message: String },
}

impl LookupError {
    /// Provider involved in the failure, if any
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::NotConfigured => None,
            Self::RateLimited { provider }
            | Self::MalformedResponse { provider, .. }
            | Self::Transport { provider, .. } => Some(provider),
        }
    }
}

/// Port for geocoding lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Per-keystroke suggestions from the first configured autocomplete provider
    async fn autocomplete(
        &self,
        query: &str,
        bias: &SearchBias,
    ) -> Result<ProviderSuggestions, LookupError>;

    /// Explicit search across every configured provider, search-only ones included
    async fn search(
        &self,
        query: &str,
        bias: &SearchBias,
    ) -> Result<ProviderSuggestions, LookupError>;

    /// Names of configured providers in preference order
    fn provider_names(&self) -> Vec<String>;
}
