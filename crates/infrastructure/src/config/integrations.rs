//! Integration configurations: geocoding, routing, fare predictor, suggestions.

use std::time::Duration;

use application::SuggestionSettings;
use domain::{BoundingBox, FallbackDistance, GeoPoint, RouteProfile, SearchBias};
use integration_fare::FareApiConfig;
use integration_geocoding::GeocodingConfig;
use integration_routing::RoutingConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::default_true;

// ==============================
// Geocoding Configuration
// ==============================

/// Geocoding provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// Mapbox access token (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub mapbox_access_token: Option<SecretString>,

    /// LocationIQ token (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub locationiq_token: Option<SecretString>,

    /// Mapbox API base URL
    #[serde(default = "default_mapbox_base_url")]
    pub mapbox_base_url: String,

    /// LocationIQ API base URL
    #[serde(default = "default_locationiq_base_url")]
    pub locationiq_base_url: String,

    /// Nominatim base URL
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,

    /// Offer Nominatim for explicit searches
    #[serde(default = "default_true")]
    pub nominatim_enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,

    /// Maximum suggestions per lookup
    #[serde(default = "default_limit")]
    pub limit: u8,

    /// ISO 3166-1 alpha-2 country filter
    #[serde(default = "default_country")]
    pub country: String,

    /// Area results are restricted to
    ///
    /// Configured as inline table:
    /// `{ min_lng = -74.259, min_lat = 40.477, max_lng = -73.7, max_lat = 40.917 }`
    #[serde(default = "BoundingBox::nyc")]
    pub viewbox: BoundingBox,

    /// Point results are ranked around, `{ lat = 40.758, lng = -73.9855 }`
    #[serde(default = "default_proximity")]
    pub proximity: Option<GeoPoint>,
}

impl std::fmt::Debug for GeocodingAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |token: &Option<SecretString>| token.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("GeocodingAppConfig")
            .field("mapbox_access_token", &redacted(&self.mapbox_access_token))
            .field("locationiq_token", &redacted(&self.locationiq_token))
            .field("nominatim_enabled", &self.nominatim_enabled)
            .field("timeout_secs", &self.timeout_secs)
            .field("limit", &self.limit)
            .field("country", &self.country)
            .field("viewbox", &self.viewbox)
            .field("proximity", &self.proximity)
            .finish_non_exhaustive()
    }
}

fn default_mapbox_base_url() -> String {
    GeocodingConfig::default().mapbox_base_url
}

fn default_locationiq_base_url() -> String {
    GeocodingConfig::default().locationiq_base_url
}

fn default_nominatim_base_url() -> String {
    GeocodingConfig::default().nominatim_base_url
}

const fn default_geocoding_timeout() -> u64 {
    10
}

const fn default_limit() -> u8 {
    6
}

fn default_country() -> String {
    "US".to_string()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_proximity() -> Option<GeoPoint> {
    Some(GeoPoint::times_square())
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            mapbox_access_token: None,
            locationiq_token: None,
            mapbox_base_url: default_mapbox_base_url(),
            locationiq_base_url: default_locationiq_base_url(),
            nominatim_base_url: default_nominatim_base_url(),
            nominatim_enabled: true,
            timeout_secs: default_geocoding_timeout(),
            limit: default_limit(),
            country: default_country(),
            viewbox: BoundingBox::nyc(),
            proximity: default_proximity(),
        }
    }
}

impl GeocodingAppConfig {
    /// Client configuration with tokens exposed
    #[must_use]
    pub fn to_client_config(&self) -> GeocodingConfig {
        let expose = |token: &Option<SecretString>| {
            token
                .as_ref()
                .map(|t| t.expose_secret().to_string())
                .filter(|t| !t.is_empty())
        };

        GeocodingConfig {
            mapbox_access_token: expose(&self.mapbox_access_token),
            locationiq_token: expose(&self.locationiq_token),
            mapbox_base_url: self.mapbox_base_url.clone(),
            locationiq_base_url: self.locationiq_base_url.clone(),
            nominatim_base_url: self.nominatim_base_url.clone(),
            nominatim_enabled: self.nominatim_enabled,
            timeout_secs: self.timeout_secs,
            limit: self.limit,
            ..GeocodingConfig::default()
        }
    }

    /// Bias sent with every lookup
    #[must_use]
    pub fn search_bias(&self) -> SearchBias {
        SearchBias {
            viewbox: self.viewbox,
            proximity: self.proximity,
            country: self.country.clone(),
        }
    }
}

// ==============================
// Routing Configuration
// ==============================

/// Routing backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingAppConfig {
    /// OSRM server base URL
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,

    /// Travel profile used for trips
    #[serde(default)]
    pub profile: RouteProfile,

    /// Request timeout in seconds
    #[serde(default = "default_routing_timeout")]
    pub timeout_secs: u64,

    /// Route cache TTL in seconds (0 disables the cache)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached routes
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Distance measure for the straight-line fallback
    #[serde(default)]
    pub fallback_distance: FallbackDistance,
}

fn default_routing_base_url() -> String {
    RoutingConfig::default().base_url
}

const fn default_routing_timeout() -> u64 {
    20
}

const fn default_cache_ttl() -> u64 {
    300
}

const fn default_cache_capacity() -> u64 {
    1000
}

impl Default for RoutingAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
            profile: RouteProfile::default(),
            timeout_secs: default_routing_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
            fallback_distance: FallbackDistance::default(),
        }
    }
}

impl RoutingAppConfig {
    /// Client configuration for the OSRM client
    #[must_use]
    pub fn to_client_config(&self) -> RoutingConfig {
        RoutingConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            cache_ttl_secs: self.cache_ttl_secs,
            cache_capacity: self.cache_capacity,
            ..RoutingConfig::default()
        }
    }
}

// ==============================
// Fare Predictor Configuration
// ==============================

/// Remote fare predictor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareAppConfig {
    /// Prediction endpoint
    #[serde(default = "default_fare_endpoint")]
    pub endpoint: String,

    /// Call the remote predictor at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "default_fare_timeout")]
    pub timeout_secs: u64,
}

fn default_fare_endpoint() -> String {
    FareApiConfig::default().endpoint
}

const fn default_fare_timeout() -> u64 {
    20
}

impl Default for FareAppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_fare_endpoint(),
            enabled: true,
            timeout_secs: default_fare_timeout(),
        }
    }
}

impl FareAppConfig {
    /// Client configuration for the predictor client
    #[must_use]
    pub fn to_client_config(&self) -> FareApiConfig {
        FareApiConfig {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
            ..FareApiConfig::default()
        }
    }
}

// ==============================
// Suggestion Configuration
// ==============================

/// Autocomplete thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsAppConfig {
    /// Shortest trimmed query that is sent to a provider
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Per-field gap between autocomplete calls in milliseconds
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

const fn default_min_query_len() -> usize {
    3
}

const fn default_cooldown_ms() -> u64 {
    600
}

impl Default for SuggestionsAppConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl SuggestionsAppConfig {
    /// Settings for the suggestion service
    #[must_use]
    pub const fn settings(&self) -> SuggestionSettings {
        SuggestionSettings {
            min_query_len: self.min_query_len,
            cooldown: Duration::from_millis(self.cooldown_ms),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the minimum query length is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_query_len == 0 {
            return Err("min_query_len must be greater than 0".to_string());
        }
        Ok(())
    }
}
