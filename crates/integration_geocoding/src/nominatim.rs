//! Nominatim search client
//!
//! Nominatim's usage policy forbids per-keystroke autocomplete, so this
//! provider only serves one-shot searches and enforces at most one request
//! per second.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::{SearchBias, Suggestion};
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::http::{self, coerce_f64, first_non_empty};
use crate::{GeocodingConfig, GeocodingError, GeocodingProvider, LookupMode};

const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1100);

/// Raw Nominatim API response
#[derive(Debug, serde::Deserialize)]
struct NominatimResult {
    #[serde(default)]
    lat: serde_json::Value,
    #[serde(default)]
    lon: serde_json::Value,
    display_name: Option<String>,
}

/// Nominatim (OpenStreetMap) search client with rate limiting
#[derive(Debug)]
pub struct NominatimSearchClient {
    client: Client,
    base_url: String,
    limit: u8,
    timeout_secs: u64,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimSearchClient {
    /// Create a new Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
            timeout_secs: config.timeout_secs,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Enforce Nominatim's rate limit (max 1 request per second)
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                let wait = MIN_REQUEST_INTERVAL.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting Nominatim request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

fn normalize_results(results: Vec<NominatimResult>, query: &str) -> Vec<Suggestion> {
    results
        .into_iter()
        .filter_map(|r| {
            let lat = coerce_f64(&r.lat)?;
            let lng = coerce_f64(&r.lon)?;
            let label = first_non_empty([r.display_name.as_deref()]).unwrap_or(query);
            Some(Suggestion::new(label, lat, lng))
        })
        .collect()
}

#[async_trait]
impl GeocodingProvider for NominatimSearchClient {
    #[instrument(skip(self, bias))]
    async fn lookup(
        &self,
        query: &str,
        bias: &SearchBias,
        mode: LookupMode,
    ) -> Result<Vec<Suggestion>, GeocodingError> {
        if mode == LookupMode::Autocomplete {
            return Err(GeocodingError::ConfigurationError(
                "Nominatim does not permit autocomplete".to_string(),
            ));
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.base_url);
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", self.limit.to_string()),
            ("viewbox", bias.viewbox.to_param()),
            ("bounded", "1".to_string()),
            ("accept-language", "en".to_string()),
        ];
        if !bias.country.is_empty() {
            params.push(("countrycodes", bias.country.to_lowercase()));
        }

        debug!(%url, "Querying Nominatim");

        let response = http::send(self.client.get(&url).query(&params), self.timeout_secs).await?;
        let results: Vec<NominatimResult> = http::parse_body(response).await?;
        let suggestions = normalize_results(results, query);

        debug!(count = suggestions.len(), "Nominatim results");
        Ok(suggestions)
    }

    fn supports(&self, mode: LookupMode) -> bool {
        mode == LookupMode::Search
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "Nominatim"
    }
}
