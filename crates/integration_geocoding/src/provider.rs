//! Geocoding provider trait

use async_trait::async_trait;
use domain::{SearchBias, Suggestion};
use serde::{Deserialize, Serialize};

use crate::GeocodingError;

/// How a lookup is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Per-keystroke suggestions
    Autocomplete,
    /// One-shot search on explicit request
    Search,
}

/// Trait for geocoding providers
///
/// Implemented by every backend (Mapbox, LocationIQ, Nominatim).
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Look up places matching `query`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, throttling
    /// or an unparseable payload. Individual entries missing coordinates are
    /// dropped instead.
    async fn lookup(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
    ) -> Result<Vec<Suggestion>, GeocodingError>;

    /// Whether the provider's usage policy allows this mode
    fn supports(&self, mode: LookupMode) -> bool;

    /// Whether a usable credential is present
    fn is_configured(&self) -> bool;

    /// Get the provider name (e.g., "Mapbox", "LocationIQ")
    fn provider_name(&self) -> &'static str;
}
