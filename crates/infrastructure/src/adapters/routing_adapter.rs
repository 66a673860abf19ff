//! Routing adapter - Implements RoutingPort using integration_routing

use application::error::ApplicationError;
use application::ports::{RouteError, RoutingPort};
use async_trait::async_trait;
use domain::{GeoPoint, RouteProfile, RouteResult};
use integration_routing::{OsrmClient, RoutingClient, RoutingConfig, RoutingError};
use tracing::instrument;

/// Adapter for the OSRM routing client
#[derive(Debug)]
pub struct RoutingAdapter {
    client: OsrmClient,
}

impl RoutingAdapter {
    /// Create an adapter with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: &RoutingConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;
        let client =
            OsrmClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map integration routing error to the port's route error
    fn map_error(err: RoutingError) -> RouteError {
        match err {
            RoutingError::RateLimitExceeded { retry_after_secs } => {
                RouteError::RateLimited { retry_after_secs }
            },
            other if other.is_malformed() => RouteError::MalformedResponse(other.to_string()),
            other => RouteError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    #[instrument(skip(self))]
    async fn route(
        &self,
        profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> Result<RouteResult, RouteError> {
        self.client
            .route(profile, from, to)
            .await
            .map_err(Self::map_error)
    }
}
