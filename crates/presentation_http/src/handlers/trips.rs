//! Stateless trip endpoints: route, local fare, remote fare

use application::RouteOutcome;
use axum::{Json, extract::State};
use chrono::{Local, NaiveDateTime};
use domain::{GeoPoint, RouteProfile, TripRequest, ValidationIssue, validate_trip};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

const fn default_passengers() -> u32 {
    1
}

/// Route request body
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub from: GeoPoint,
    pub to: GeoPoint,
    /// Configured profile when omitted
    #[serde(default)]
    pub profile: Option<RouteProfile>,
}

/// Route between two points, falling back to a straight line
#[instrument(skip(state))]
pub async fn route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteOutcome>, ApiError> {
    let issues = validate_trip(&request.from, &request.to, 1);
    if !issues.is_empty() {
        return Err(ApiError::Validation(
            issues.iter().map(ToString::to_string).collect(),
        ));
    }

    let profile = request
        .profile
        .unwrap_or_else(|| state.services.routes.profile());
    Ok(Json(
        state
            .services
            .routes
            .resolve_with(profile, request.from, request.to)
            .await,
    ))
}

/// Local fare request body
#[derive(Debug, Deserialize)]
pub struct LocalFareRequest {
    pub distance_km: f64,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
}

/// Local fare estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFareResponse {
    pub distance_km: f64,
    pub passengers: u32,
    pub estimate: f64,
}

/// Fare from the local heuristic
pub async fn local_fare(
    State(state): State<AppState>,
    Json(request): Json<LocalFareRequest>,
) -> Result<Json<LocalFareResponse>, ApiError> {
    if !request.distance_km.is_finite() || request.distance_km < 0.0 {
        return Err(ApiError::BadRequest(
            "distance_km must be a non-negative number".to_string(),
        ));
    }
    if request.passengers < 1 {
        return Err(ApiError::Validation(vec![
            ValidationIssue::PassengerCount.to_string(),
        ]));
    }

    Ok(Json(LocalFareResponse {
        distance_km: request.distance_km,
        passengers: request.passengers,
        estimate: state
            .services
            .fares
            .local_estimate(request.distance_km, request.passengers),
    }))
}

/// Remote fare request body
#[derive(Debug, Deserialize)]
pub struct RemoteFareRequest {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    /// Local pickup time; now when omitted
    #[serde(default)]
    pub pickup_datetime: Option<NaiveDateTime>,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
}

/// Remote predictor answer
#[derive(Debug, Clone, Serialize)]
pub struct RemoteFareResponse {
    pub endpoint: Option<String>,
    pub fare: Option<f64>,
    /// Response key the fare was read from
    pub fare_key: Option<String>,
    pub response: Value,
}

/// Ask the remote fare predictor
#[instrument(skip(state))]
pub async fn remote_fare(
    State(state): State<AppState>,
    Json(request): Json<RemoteFareRequest>,
) -> Result<Json<RemoteFareResponse>, ApiError> {
    let pickup_datetime = request
        .pickup_datetime
        .unwrap_or_else(|| Local::now().naive_local());
    let trip = TripRequest::new(
        request.pickup,
        request.dropoff,
        pickup_datetime,
        request.passengers,
    )?;

    let fares = &state.services.fares;
    let remote = fares.remote_estimate(&trip.fare_payload()).await?;

    Ok(Json(RemoteFareResponse {
        endpoint: fares.remote_endpoint(),
        fare: remote.fare,
        fare_key: remote.key,
        response: remote.raw,
    }))
}
