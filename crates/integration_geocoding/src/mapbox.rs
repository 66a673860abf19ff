//! Mapbox Geocoding v6 client
//!
//! Forward geocoding with autocomplete
//! (<https://docs.mapbox.com/api/search/geocoding/>).

use async_trait::async_trait;
use domain::{SearchBias, Suggestion};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::http::{self, coerce_f64, first_non_empty};
use crate::{GeocodingConfig, GeocodingError, GeocodingProvider, LookupMode};

/// Mapbox v6 response structures
mod api {
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    pub struct FeatureCollection {
        #[serde(default)]
        pub features: Vec<Feature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Feature {
        pub geometry: Option<Geometry>,
        pub properties: Option<Properties>,
        pub place_name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        #[serde(default)]
        pub coordinates: Vec<Value>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Properties {
        pub full_address: Option<String>,
        pub name: Option<String>,
    }
}

/// Mapbox Geocoding v6 client
pub struct MapboxGeocodingClient {
    client: Client,
    access_token: Option<String>,
    base_url: String,
    limit: u8,
    timeout_secs: u64,
}

impl std::fmt::Debug for MapboxGeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxGeocodingClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl MapboxGeocodingClient {
    /// Create a new Mapbox client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: http::build_client(config)?,
            access_token: config.mapbox_access_token.clone(),
            base_url: config.mapbox_base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
            timeout_secs: config.timeout_secs,
        })
    }

    fn params(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
        token: &str,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("limit", self.limit.to_string()),
            (
                "autocomplete",
                (mode == LookupMode::Autocomplete).to_string(),
            ),
            ("bbox", bias.viewbox.to_param()),
        ];

        if !bias.country.is_empty() {
            params.push(("country", bias.country.to_uppercase()));
        }
        if let Some(proximity) = bias.proximity_param() {
            params.push(("proximity", proximity));
        }

        params.push(("access_token", token.to_string()));
        params
    }
}

/// Map Mapbox features to suggestions, dropping features without coordinates
///
/// Label preference: `properties.full_address`, `properties.name`,
/// `place_name`, then the query itself.
pub(crate) fn normalize_features(
    collection: api::FeatureCollection,
    query: &str,
) -> Vec<Suggestion> {
    collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let coords = feature.geometry.as_ref()?.coordinates.as_slice();
            let lng = coerce_f64(coords.first()?)?;
            let lat = coerce_f64(coords.get(1)?)?;

            let props = feature.properties.as_ref();
            let label = first_non_empty([
                props.and_then(|p| p.full_address.as_deref()),
                props.and_then(|p| p.name.as_deref()),
                feature.place_name.as_deref(),
            ])
            .unwrap_or(query);

            Some(Suggestion::new(label, lat, lng))
        })
        .collect()
}

#[async_trait]
impl GeocodingProvider for MapboxGeocodingClient {
    #[instrument(skip(self, bias))]
    async fn lookup(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
    ) -> Result<Vec<Suggestion>, GeocodingError> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            GeocodingError::ConfigurationError("Mapbox access token is required".to_string())
        })?;

        let url = format!("{}/search/geocode/v6/forward", self.base_url);
        let params = self.params(query, bias, mode, token);

        debug!(%url, "Querying Mapbox");

        let response = http::send(self.client.get(&url).query(&params), self.timeout_secs).await?;
        let collection: api::FeatureCollection = http::parse_body(response).await?;
        let suggestions = normalize_features(collection, query);

        debug!(count = suggestions.len(), "Mapbox suggestions");
        Ok(suggestions)
    }

    fn supports(&self, _mode: LookupMode) -> bool {
        true
    }

    fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    fn provider_name(&self) -> &'static str {
        "Mapbox"
    }
}
