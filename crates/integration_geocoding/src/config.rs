//! Geocoding provider configuration

use serde::{Deserialize, Serialize};

/// Configuration shared by all geocoding providers
///
/// A provider without a credential stays in the chain but reports itself
/// as not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Mapbox access token (enables Mapbox as primary provider)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox_access_token: Option<String>,

    /// LocationIQ API key (enables LocationIQ as fallback provider)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locationiq_token: Option<String>,

    /// Mapbox API base URL
    #[serde(default = "default_mapbox_base_url")]
    pub mapbox_base_url: String,

    /// LocationIQ API base URL
    #[serde(default = "default_locationiq_base_url")]
    pub locationiq_base_url: String,

    /// Nominatim API base URL
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,

    /// Offer Nominatim for one-shot search (it needs no credential)
    #[serde(default = "default_nominatim_enabled")]
    pub nominatim_enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of suggestions per request
    #[serde(default = "default_limit")]
    pub limit: u8,

    /// User agent sent with every request (required by Nominatim)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_mapbox_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_locationiq_base_url() -> String {
    "https://api.locationiq.com".to_string()
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_nominatim_enabled() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_limit() -> u8 {
    6
}

fn default_user_agent() -> String {
    "TripFare/1.0".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            mapbox_access_token: None,
            locationiq_token: None,
            mapbox_base_url: default_mapbox_base_url(),
            locationiq_base_url: default_locationiq_base_url(),
            nominatim_base_url: default_nominatim_base_url(),
            nominatim_enabled: default_nominatim_enabled(),
            timeout_secs: default_timeout_secs(),
            limit: default_limit(),
            user_agent: default_user_agent(),
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration for testing (no credentials, short timeout)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            nominatim_enabled: false,
            ..Default::default()
        }
    }

    /// Point every provider at the same base URL (mock servers)
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.mapbox_base_url = base_url.to_string();
        self.locationiq_base_url = base_url.to_string();
        self.nominatim_base_url = base_url.to_string();
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.limit == 0 || self.limit > 10 {
            return Err("limit must be between 1 and 10".to_string());
        }

        for (name, url) in [
            ("mapbox_base_url", &self.mapbox_base_url),
            ("locationiq_base_url", &self.locationiq_base_url),
            ("nominatim_base_url", &self.nominatim_base_url),
        ] {
            if url.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if self.mapbox_access_token.as_deref() == Some("") {
            return Err("mapbox_access_token must not be empty when set".to_string());
        }

        if self.locationiq_token.as_deref() == Some("") {
            return Err("locationiq_token must not be empty when set".to_string());
        }

        Ok(())
    }
}
