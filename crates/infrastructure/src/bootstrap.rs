//! Service wiring shared by the CLI and the HTTP server

use std::sync::Arc;

use application::{
    ApplicationError, FareService, RouteService, SuggestionService, TripServices,
};
use tracing::info;

use crate::adapters::{FarePredictorAdapter, GeocodingAdapter, RoutingAdapter};
use crate::config::AppConfig;

/// Build the services every trip session shares
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an HTTP client
/// cannot be created.
pub fn build_trip_services(config: &AppConfig) -> Result<Arc<TripServices>, ApplicationError> {
    config.validate().map_err(ApplicationError::Configuration)?;

    let geocoding = GeocodingAdapter::new(&config.geocoding.to_client_config())?;
    let routing = RoutingAdapter::new(&config.routing.to_client_config())?;

    let fares = if config.fare.enabled {
        let predictor = FarePredictorAdapter::new(&config.fare.to_client_config())?;
        FareService::new(Arc::new(predictor))
    } else {
        FareService::local_only()
    };

    info!(
        routing = %config.routing.base_url,
        profile = %config.routing.profile,
        remote_fare = config.fare.enabled,
        "Trip services ready"
    );

    Ok(Arc::new(TripServices {
        suggestions: SuggestionService::new(
            Arc::new(geocoding),
            config.geocoding.search_bias(),
            config.suggestions.settings(),
        ),
        routes: RouteService::new(
            Arc::new(routing),
            config.routing.profile,
            config.routing.fallback_distance,
        ),
        fares,
    }))
}
