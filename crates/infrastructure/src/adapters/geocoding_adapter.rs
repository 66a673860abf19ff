//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use application::error::ApplicationError;
use application::ports::{GeocodingPort, LookupError, ProviderSuggestions};
use async_trait::async_trait;
use domain::SearchBias;
use integration_geocoding::{GeocodingConfig, GeocodingError, LookupMode, ProviderChain};
use tracing::{debug, instrument};

/// Adapter for the ordered geocoding provider chain
#[derive(Debug, Clone)]
pub struct GeocodingAdapter {
    chain: ProviderChain,
}

impl GeocodingAdapter {
    /// Build the standard provider chain from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider's HTTP client fails to initialize.
    pub fn new(config: &GeocodingConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;
        let chain = ProviderChain::from_config(config)
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { chain })
    }

    /// Wrap an existing chain
    #[must_use]
    pub const fn from_chain(chain: ProviderChain) -> Self {
        Self { chain }
    }

    async fn lookup(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
    ) -> Result<ProviderSuggestions, LookupError> {
        let Some(lookup) = self.chain.lookup(query, bias, mode).await else {
            debug!(?mode, "No geocoding provider configured");
            return Err(LookupError::NotConfigured);
        };

        lookup
            .result
            .map(|suggestions| ProviderSuggestions {
                provider: lookup.provider.to_string(),
                suggestions,
            })
            .map_err(|e| Self::map_error(lookup.provider, &e))
    }

    /// Map integration geocoding error to the port's lookup error
    fn map_error(provider: &str, err: &GeocodingError) -> LookupError {
        let provider = provider.to_string();
        if err.is_rate_limited() {
            LookupError::RateLimited { provider }
        } else if err.is_malformed() {
            LookupError::MalformedResponse {
                provider,
                message: err.to_string(),
            }
        } else {
            LookupError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self, bias))]
    async fn autocomplete(
        &self,
        query: &str,
        bias: &SearchBias,
    ) -> Result<ProviderSuggestions, LookupError> {
        self.lookup(query, bias, LookupMode::Autocomplete).await
    }

    #[instrument(skip(self, bias))]
    async fn search(
        &self,
        query: &str,
        bias: &SearchBias,
    ) -> Result<ProviderSuggestions, LookupError> {
        self.lookup(query, bias, LookupMode::Search).await
    }

    fn provider_names(&self) -> Vec<String> {
        self.chain
            .provider_names()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_rate_limited() {
        let err = GeocodingError::RateLimitExceeded {
            retry_after_secs: Some(1),
        };
        assert_eq!(
            GeocodingAdapter::map_error("Mapbox", &err),
            LookupError::RateLimited {
                provider: "Mapbox".to_string()
            }
        );
    }

    #[test]
    fn test_map_parse_error_is_malformed() {
        let err = GeocodingError::ParseError("expected value".to_string());
        assert!(matches!(
            GeocodingAdapter::map_error("LocationIQ", &err),
            LookupError::MalformedResponse { .. }
        ));
    }

    #[test]
    fn test_map_timeout_is_transport() {
        let err = GeocodingError::Timeout { timeout_secs: 10 };
        let mapped = GeocodingAdapter::map_error("Mapbox", &err);
        assert_eq!(mapped.provider(), Some("Mapbox"));
        assert!(matches!(mapped, LookupError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_empty_chain_is_not_configured() {
        let adapter = GeocodingAdapter::from_chain(ProviderChain::default());
        let err = adapter
            .autocomplete("times square", &SearchBias::default())
            .await
            .unwrap_err();
        assert_eq!(err, LookupError::NotConfigured);
        assert!(adapter.provider_names().is_empty());
    }

    #[test]
    fn test_default_chain_lists_all_providers() {
        let adapter = GeocodingAdapter::new(&GeocodingConfig::default()).unwrap();
        assert_eq!(
            adapter.provider_names(),
            vec!["Mapbox", "LocationIQ", "Nominatim"]
        );
    }
}
