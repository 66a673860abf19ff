//! Ordered provider chain
//!
//! Providers are consulted in a fixed preference order. The first one that
//! is configured and supports the requested mode is used exclusively;
//! results are never mixed across providers.

use std::sync::Arc;

use domain::{SearchBias, Suggestion};
use tracing::{debug, info};

use crate::{
    GeocodingConfig, GeocodingError, GeocodingProvider, LocationIqClient, LookupMode,
    MapboxGeocodingClient, NominatimSearchClient,
};

/// Result of a chain lookup, tagged with the provider that served it
#[derive(Debug)]
pub struct ProviderLookup {
    /// Name of the provider that was selected
    pub provider: &'static str,
    /// What that provider returned
    pub result: Result<Vec<Suggestion>, GeocodingError>,
}

/// Preference-ordered list of geocoding providers
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn GeocodingProvider>>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ProviderChain {
    /// Create a chain from providers in preference order
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn GeocodingProvider>>) -> Self {
        Self { providers }
    }

    /// Build the standard chain: Mapbox, LocationIQ, then Nominatim if enabled
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let mut providers: Vec<Arc<dyn GeocodingProvider>> = vec![
            Arc::new(MapboxGeocodingClient::new(config)?),
            Arc::new(LocationIqClient::new(config)?),
        ];
        if config.nominatim_enabled {
            providers.push(Arc::new(NominatimSearchClient::new(config)?));
        }

        let chain = Self::new(providers);
        info!(
            autocomplete = chain.select(LookupMode::Autocomplete).map(|p| p.provider_name()),
            search = chain.select(LookupMode::Search).map(|p| p.provider_name()),
            "Geocoding providers resolved"
        );
        Ok(chain)
    }

    /// Names of all providers in preference order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// First configured provider supporting `mode`
    #[must_use]
    pub fn select(&self, mode: LookupMode) -> Option<&Arc<dyn GeocodingProvider>> {
        self.providers
            .iter()
            .find(|p| p.is_configured() && p.supports(mode))
    }

    /// Run a lookup against the selected provider
    ///
    /// Returns `None` when no provider is available for `mode`. A failing
    /// provider does not fall through to the next one.
    pub async fn lookup(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
    ) -> Option<ProviderLookup> {
        let provider = self.select(mode)?;
        debug!(provider = provider.provider_name(), ?mode, "Dispatching geocoding lookup");

        Some(ProviderLookup {
            provider: provider.provider_name(),
            result: provider.lookup(query, bias, mode).await,
        })
    }
}
