//! Health check handler

use axum::{Json, extract::State};
use domain::RouteProfile;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Geocoding providers with credentials, in lookup order
    pub geocoding_providers: Vec<String>,
    pub routing_profile: RouteProfile,
    pub remote_fare_enabled: bool,
    pub active_sessions: u64,
}

/// Liveness check with a summary of configured backends
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoding_providers: state.services.suggestions.provider_names(),
        routing_profile: state.services.routes.profile(),
        remote_fare_enabled: state.services.fares.remote_enabled(),
        active_sessions: state.sessions.count().await,
    })
}
