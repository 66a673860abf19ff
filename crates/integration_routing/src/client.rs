//! OSRM routing client
//!
//! Queries the OSRM `/route` service
//! (<https://project-osrm.org/docs/v5.24.0/api/#route-service>) for full
//! GeoJSON geometry and caches results per request inputs.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoPoint, RouteProfile, RouteResult, RouteSource};
use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::OsrmResponse;

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Compute a road route between two points
    async fn route(
        &self,
        profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> Result<RouteResult, RoutingError>;
}

/// Cache key: exact request inputs, coordinates compared bitwise
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    server: String,
    profile: RouteProfile,
    coordinates: [u64; 4],
}

impl RouteKey {
    fn new(server: &str, profile: RouteProfile, from: GeoPoint, to: GeoPoint) -> Self {
        Self {
            server: server.to_string(),
            profile,
            coordinates: [
                from.lat().to_bits(),
                from.lng().to_bits(),
                to.lat().to_bits(),
                to.lng().to_bits(),
            ],
        }
    }
}

/// OSRM-backed routing client with a short-lived response cache
#[derive(Debug)]
pub struct OsrmClient {
    client: Client,
    config: RoutingConfig,
    cache: Option<Cache<RouteKey, RouteResult>>,
}

impl OsrmClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(Duration::from_secs(config.cache_ttl_secs))
                .build()
        });

        Ok(Self {
            client,
            config: RoutingConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config.clone()
            },
            cache,
        })
    }

    /// Request URL for a pair of points, longitude first
    fn route_url(&self, profile: RouteProfile, from: GeoPoint, to: GeoPoint) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.config.base_url,
            profile.as_str(),
            from.lng(),
            from.lat(),
            to.lng(),
            to.lat()
        )
    }

    /// Convert a parsed OSRM response into a route result
    fn parse_route_response(body: &str) -> Result<RouteResult, RoutingError> {
        let raw: OsrmResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            return Err(RoutingError::Unsuccessful {
                code: raw.code,
                message: raw.message.unwrap_or_default(),
            });
        }

        let route = raw.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;
        let path = route.geometry.to_path();
        if path.len() < 2 {
            return Err(RoutingError::ParseError(
                "Route geometry has fewer than two points".to_string(),
            ));
        }

        Ok(RouteResult {
            distance_km: route.distance.max(0.0) / 1000.0,
            duration_min: route.duration.max(0.0) / 60.0,
            path,
            source: RouteSource::Routed,
        })
    }

    async fn fetch_route(
        &self,
        profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> Result<RouteResult, RoutingError> {
        let url = self.route_url(profile, from, to);
        let params = [("geometries", "geojson"), ("overview", "full")];

        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        Self::parse_route_response(&body)
    }
}

#[async_trait]
impl RoutingClient for OsrmClient {
    #[instrument(skip(self, from, to), fields(from = %from, to = %to))]
    async fn route(
        &self,
        profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> Result<RouteResult, RoutingError> {
        let Some(cache) = &self.cache else {
            return self.fetch_route(profile, from, to).await;
        };

        let key = RouteKey::new(&self.config.base_url, profile, from, to);
        if let Some(cached) = cache.get(&key).await {
            debug!("Route cache hit");
            return Ok(cached);
        }

        let result = self.fetch_route(profile, from, to).await?;
        cache.insert(key, result.clone()).await;

        debug!(
            distance_km = result.distance_km,
            duration_min = result.duration_min,
            points = result.path.len(),
            "Route resolved"
        );
        Ok(result)
    }
}
