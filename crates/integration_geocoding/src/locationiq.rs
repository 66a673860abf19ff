//! LocationIQ client
//!
//! Autocomplete (<https://docs.locationiq.com/reference/autocomplete-2>) for
//! per-keystroke suggestions and forward search for one-shot lookups.

use async_trait::async_trait;
use domain::{SearchBias, Suggestion};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::http::{self, coerce_f64, first_non_empty};
use crate::{GeocodingConfig, GeocodingError, GeocodingProvider, LookupMode};

/// LocationIQ response structures
mod api {
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    pub struct Place {
        #[serde(default)]
        pub lat: Value,
        #[serde(default)]
        pub lon: Value,
        pub display_name: Option<String>,
        pub display_place: Option<String>,
        pub display_address: Option<String>,
    }
}

/// LocationIQ geocoding client
pub struct LocationIqClient {
    client: Client,
    token: Option<String>,
    base_url: String,
    limit: u8,
    timeout_secs: u64,
}

impl std::fmt::Debug for LocationIqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationIqClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl LocationIqClient {
    /// Create a new LocationIQ client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: http::build_client(config)?,
            token: config.locationiq_token.clone(),
            base_url: config.locationiq_base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self, mode: LookupMode) -> String {
        match mode {
            LookupMode::Autocomplete => format!("{}/v1/autocomplete", self.base_url),
            LookupMode::Search => format!("{}/v1/search", self.base_url),
        }
    }

    fn params(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
        token: &str,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", token.to_string()),
            ("q", query.to_string()),
            ("limit", self.limit.to_string()),
            ("viewbox", bias.viewbox.to_param()),
            ("bounded", "1".to_string()),
            ("accept-language", "en".to_string()),
        ];

        if !bias.country.is_empty() {
            params.push(("countrycodes", bias.country.to_lowercase()));
        }
        if mode == LookupMode::Search {
            params.push(("format", "json".to_string()));
        }

        params
    }
}

/// Map LocationIQ places to suggestions, dropping places without coordinates
///
/// Label preference: `display_name`, then `display_place` joined with
/// `display_address`, then the query itself.
pub(crate) fn normalize_places(places: Vec<api::Place>, query: &str) -> Vec<Suggestion> {
    places
        .into_iter()
        .filter_map(|place| {
            let lat = coerce_f64(&place.lat)?;
            let lng = coerce_f64(&place.lon)?;

            let label = first_non_empty([place.display_name.as_deref()])
                .map(str::to_string)
                .or_else(|| join_display_parts(&place))
                .unwrap_or_else(|| query.to_string());

            Some(Suggestion::new(label, lat, lng))
        })
        .collect()
}

fn join_display_parts(place: &api::Place) -> Option<String> {
    let parts: Vec<&str> = [place.display_place.as_deref(), place.display_address.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

#[async_trait]
impl GeocodingProvider for LocationIqClient {
    #[instrument(skip(self, bias))]
    async fn lookup(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
    ) -> Result<Vec<Suggestion>, GeocodingError> {
        let token = self.token.as_deref().ok_or_else(|| {
            GeocodingError::ConfigurationError("LocationIQ token is required".to_string())
        })?;

        let url = self.endpoint(mode);
        let params = self.params(query, bias, mode, token);

        debug!(%url, "Querying LocationIQ");

        let response = http::send(self.client.get(&url).query(&params), self.timeout_secs).await?;

        // LocationIQ answers 404 when nothing matches
        if response.status() == StatusCode::NOT_FOUND {
            debug!("LocationIQ found no matches");
            return Ok(Vec::new());
        }

        let places: Vec<api::Place> = http::parse_body(response).await?;
        let suggestions = normalize_places(places, query);

        debug!(count = suggestions.len(), "LocationIQ suggestions");
        Ok(suggestions)
    }

    fn supports(&self, _mode: LookupMode) -> bool {
        true
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    fn provider_name(&self) -> &'static str {
        "LocationIQ"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<api::Place> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_string_and_numeric_coordinates() {
        let places = parse(
            r#"[
                {"lat": "40.758", "lon": "-73.9855", "display_name": "Times Square"},
                {"lat": 40.7676, "lon": -73.9817, "display_name": "Central Park South"}
            ]"#,
        );
        let suggestions = normalize_places(places, "q");
        assert_eq!(
            suggestions,
            vec![
                Suggestion::new("Times Square", 40.758, -73.9855),
                Suggestion::new("Central Park South", 40.7676, -73.9817),
            ]
        );
    }

    #[test]
    fn test_label_fallbacks() {
        let places = parse(
            r#"[
                {"lat": "40.1", "lon": "-73.1", "display_place": "Macy's", "display_address": "151 W 34th St"},
                {"lat": "40.2", "lon": "-73.2", "display_name": ""}
            ]"#,
        );
        let labels: Vec<_> = normalize_places(places, "macy")
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["Macy's, 151 W 34th St", "macy"]);
    }

    #[test]
    fn test_places_without_coordinates_dropped() {
        let places = parse(
            r#"[
                {"lon": "-73.1", "display_name": "No lat"},
                {"lat": "north", "lon": "-73.1", "display_name": "Bad lat"},
                {"lat": "40.3", "lon": "-73.3", "display_name": "Good"}
            ]"#,
        );
        let suggestions = normalize_places(places, "q");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label, "Good");
    }

    #[test]
    fn test_search_mode_endpoint_and_params() {
        let config = GeocodingConfig {
            locationiq_token: Some("pk.liq".to_string()),
            ..GeocodingConfig::for_testing()
        };
        let client = LocationIqClient::new(&config).unwrap();

        assert!(client.endpoint(LookupMode::Autocomplete).ends_with("/v1/autocomplete"));
        assert!(client.endpoint(LookupMode::Search).ends_with("/v1/search"));

        let params = client.params("q", &SearchBias::default(), LookupMode::Search, "pk.liq");
        assert!(params.contains(&("countrycodes", "us".to_string())));
        assert!(params.contains(&("bounded", "1".to_string())));
        assert!(params.contains(&("format", "json".to_string())));
    }
}
