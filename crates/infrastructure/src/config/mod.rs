//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server and session registry settings
//! - `logging`: log filter and output format
//! - `integrations`: geocoding, routing, fare predictor, suggestion thresholds
//!
//! Sources, lowest precedence first: built-in defaults, `config.toml` (or an
//! explicit path), then `TRIPFARE__SECTION__KEY` environment variables.
//! Provider tokens additionally fall back to `MAPBOX_ACCESS_TOKEN` and
//! `LOCATIONIQ_TOKEN`.

mod integrations;
mod logging;
mod server;

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use integrations::{FareAppConfig, GeocodingAppConfig, RoutingAppConfig, SuggestionsAppConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use server::{ServerConfig, SessionsConfig};

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "TRIPFARE";

/// Conventional variable holding the Mapbox token
pub const MAPBOX_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";

/// Conventional variable holding the LocationIQ token
pub const LOCATIONIQ_TOKEN_VAR: &str = "LOCATIONIQ_TOKEN";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Geocoding providers
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Routing backend
    #[serde(default)]
    pub routing: RoutingAppConfig,

    /// Remote fare predictor
    #[serde(default)]
    pub fare: FareAppConfig,

    /// Autocomplete thresholds
    #[serde(default)]
    pub suggestions: SuggestionsAppConfig,

    /// Session registry
    #[serde(default)]
    pub sessions: SessionsConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `config.toml` when given
    ///
    /// An explicit path must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_token_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Fill missing provider tokens from conventional variables
    ///
    /// Tokens already set by a config source are kept. Empty values are
    /// ignored.
    pub fn apply_token_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.geocoding.mapbox_access_token.is_none()
            && let Some(token) = non_empty(MAPBOX_TOKEN_VAR)
        {
            debug!("Loaded Mapbox token from {MAPBOX_TOKEN_VAR}");
            self.geocoding.mapbox_access_token = Some(SecretString::from(token));
        }

        if self.geocoding.locationiq_token.is_none()
            && let Some(token) = non_empty(LOCATIONIQ_TOKEN_VAR)
        {
            debug!("Loaded LocationIQ token from {LOCATIONIQ_TOKEN_VAR}");
            self.geocoding.locationiq_token = Some(SecretString::from(token));
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section name.
    pub fn validate(&self) -> Result<(), String> {
        self.geocoding
            .to_client_config()
            .validate()
            .map_err(|e| format!("geocoding: {e}"))?;
        self.routing
            .to_client_config()
            .validate()
            .map_err(|e| format!("routing: {e}"))?;
        if self.fare.enabled {
            self.fare
                .to_client_config()
                .validate()
                .map_err(|e| format!("fare: {e}"))?;
        }
        self.suggestions
            .validate()
            .map_err(|e| format!("suggestions: {e}"))?;
        self.sessions
            .validate()
            .map_err(|e| format!("sessions: {e}"))?;
        Ok(())
    }
}
