//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use application::{
    FareError, FarePort, FareService, GeocodingPort, LookupError, ProviderSuggestions, RemoteFare,
    RouteError, RouteService, RoutingPort, SuggestionService, SuggestionSettings, TripServices,
};
use async_trait::async_trait;
use axum_test::TestServer;
use domain::{
    FallbackDistance, FarePayload, GeoPoint, RouteProfile, RouteResult, RouteSource, SearchBias,
    Suggestion,
};
use infrastructure::AppConfig;
use presentation_http::{AppState, create_router};
use serde_json::{Value, json};

/// Geocoder answering every query with the same two places
struct StubGeocoder;

#[async_trait]
impl GeocodingPort for StubGeocoder {
    async fn autocomplete(
        &self,
        _query: &str,
        _bias: &SearchBias,
    ) -> Result<ProviderSuggestions, LookupError> {
        Ok(ProviderSuggestions {
            provider: "Mapbox".to_string(),
            suggestions: vec![
                Suggestion::new("Grand Central Terminal, New York", 40.7527, -73.9772),
                Suggestion::new("Grand Central Parkway, Queens", 40.7712, -73.8746),
            ],
        })
    }

    async fn search(
        &self,
        query: &str,
        bias: &SearchBias,
    ) -> Result<ProviderSuggestions, LookupError> {
        self.autocomplete(query, bias).await
    }

    fn provider_names(&self) -> Vec<String> {
        vec!["Mapbox".to_string()]
    }
}

/// Router that either returns a fixed route or is rate limited
#[derive(Default)]
struct StubRouter {
    rate_limited: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl RoutingPort for StubRouter {
    async fn route(
        &self,
        _profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> Result<RouteResult, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.rate_limited {
            return Err(RouteError::RateLimited {
                retry_after_secs: None,
            });
        }
        Ok(RouteResult {
            distance_km: 2.0,
            duration_min: 6.0,
            path: vec![from, GeoPoint::new_unchecked(40.762, -73.983), to],
            source: RouteSource::Routed,
        })
    }
}

#[derive(Default)]
struct StubPredictor {
    calls: AtomicUsize,
}

#[async_trait]
impl FarePort for StubPredictor {
    async fn predict(&self, payload: &FarePayload) -> Result<RemoteFare, FareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteFare {
            fare: Some(12.5),
            key: Some("fare".to_string()),
            raw: json!({"fare": 12.5, "passengers": payload.passenger_count}),
        })
    }

    fn endpoint(&self) -> String {
        "https://fares.test/predict".to_string()
    }
}

struct Harness {
    server: TestServer,
    router: Arc<StubRouter>,
    predictor: Arc<StubPredictor>,
}

fn harness_with(router: StubRouter, remote_fare: bool) -> Harness {
    let router = Arc::new(router);
    let predictor = Arc::new(StubPredictor::default());

    let fares = if remote_fare {
        FareService::new(Arc::clone(&predictor) as Arc<dyn FarePort>)
    } else {
        FareService::local_only()
    };
    let services = Arc::new(TripServices {
        suggestions: SuggestionService::new(
            Arc::new(StubGeocoder),
            SearchBias::default(),
            SuggestionSettings::default(),
        ),
        routes: RouteService::new(
            Arc::clone(&router) as Arc<dyn RoutingPort>,
            RouteProfile::Driving,
            FallbackDistance::DegreeApprox,
        ),
        fares,
    });

    let state = AppState::new(services, AppConfig::default());
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    Harness {
        server,
        router,
        predictor,
    }
}

fn harness() -> Harness {
    harness_with(StubRouter::default(), true)
}

async fn new_session(server: &TestServer) -> String {
    let response = server.post("/v1/sessions").await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["id"].as_str().expect("session id").to_string()
}

async fn send_event(server: &TestServer, id: &str, event: Value) -> Value {
    let response = server
        .post(&format!("/v1/sessions/{id}/events"))
        .json(&event)
        .await;
    response.assert_status_ok();
    response.json()
}

// ============ Health ============

#[tokio::test]
async fn health_endpoint_reports_backends() {
    let h = harness();
    new_session(&h.server).await;

    let response = h.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["geocoding_providers"], json!(["Mapbox"]));
    assert_eq!(body["routing_profile"], "driving");
    assert_eq!(body["remote_fare_enabled"], true);
    assert_eq!(body["active_sessions"], 1);
}

// ============ Sessions ============

#[tokio::test]
async fn new_session_starts_with_new_york_defaults() {
    let h = harness();

    let response = h.server.post("/v1/sessions").await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["state"]["pickup_label"], "Times Square, New York, NY");
    assert_eq!(body["state"]["dropoff_label"], "Central Park South, New York, NY");
    assert_eq!(body["queries"]["pickup"], "Times Square, New York, NY");
    assert_eq!(body["suggestions"]["pickup"], json!([]));
}

#[tokio::test]
async fn query_then_select_updates_dropoff() {
    let h = harness();
    let id = new_session(&h.server).await;

    let shown = send_event(
        &h.server,
        &id,
        json!({"type": "query", "field": "dropoff", "text": "grand central"}),
    )
    .await;
    assert_eq!(shown["render"]["kind"], "show_suggestions");
    assert_eq!(shown["render"]["data"]["field"], "dropoff");
    assert_eq!(shown["render"]["data"]["suggestions"].as_array().map(Vec::len), Some(2));

    let selected = send_event(
        &h.server,
        &id,
        json!({"type": "select_suggestion", "field": "dropoff", "index": 0}),
    )
    .await;
    assert_eq!(selected["render"]["kind"], "rerender");
    assert_eq!(selected["state"]["dropoff_label"], "Grand Central Terminal, New York");
    assert_eq!(selected["state"]["dropoff"], json!({"lat": 40.7527, "lng": -73.9772}));

    let snapshot: Value = h.server.get(&format!("/v1/sessions/{id}")).await.json();
    assert_eq!(snapshot["suggestions"]["dropoff"].as_array().map(Vec::len), Some(2));
    assert_eq!(snapshot["suggestions"]["pickup"], json!([]));
}

#[tokio::test]
async fn invalid_trip_is_rejected_before_any_call() {
    let h = harness();
    let id = new_session(&h.server).await;

    // Unchecked click nearer the dropoff marker.
    let clicked = send_event(
        &h.server,
        &id,
        json!({"type": "click", "lat": 95.0, "lng": -73.98}),
    )
    .await;
    assert_eq!(clicked["state"]["dropoff"]["lat"], 95.0);

    let outcome = send_event(
        &h.server,
        &id,
        json!({"type": "request_trip", "passengers": 0}),
    )
    .await;

    assert_eq!(outcome["render"]["kind"], "show_validation_errors");
    assert_eq!(
        outcome["render"]["data"],
        json!(["Dropoff: coordinates out of bounds.", "Passengers must be ≥ 1."])
    );
    assert_eq!(h.router.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.predictor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn trip_request_prices_route() {
    let h = harness();
    let id = new_session(&h.server).await;

    let outcome = send_event(
        &h.server,
        &id,
        json!({"type": "request_trip", "pickup_datetime": "2014-07-06T19:18:00", "passengers": 2}),
    )
    .await;

    assert_eq!(outcome["render"]["kind"], "show_trip");
    let report = &outcome["render"]["data"];
    assert_eq!(report["route"]["source"], "routed");
    assert_eq!(report["route"]["distance_km"], 2.0);
    assert_eq!(report["quote"]["remote_estimate"], 12.5);
    assert_eq!(report["fare_exchange"]["request"]["pickup_datetime"], "2014-07-06 19:18:00");
    assert_eq!(report["fare_exchange"]["request"]["passenger_count"], 2);
    assert_eq!(outcome["notices"], json!([]));
}

#[tokio::test]
async fn rate_limited_routing_falls_back_with_warning() {
    let h = harness_with(
        StubRouter {
            rate_limited: true,
            ..Default::default()
        },
        false,
    );
    let id = new_session(&h.server).await;

    let outcome = send_event(&h.server, &id, json!({"type": "request_trip"})).await;

    let report = &outcome["render"]["data"];
    assert_eq!(report["route"]["source"], "straight_line");
    assert_eq!(report["route"]["path"].as_array().map(Vec::len), Some(2));
    assert!(report["quote"]["remote_estimate"].is_null());
    assert_eq!(outcome["notices"][0]["level"], "warning");
    assert_eq!(h.router.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let h = harness();
    let id = new_session(&h.server).await;

    h.server
        .delete(&format!("/v1/sessions/{id}"))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let response = h.server.get(&format!("/v1/sessions/{id}")).await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "not_found");

    h.server
        .delete(&format!("/v1/sessions/{id}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn unknown_event_type_is_rejected() {
    let h = harness();
    let id = new_session(&h.server).await;

    let response = h
        .server
        .post(&format!("/v1/sessions/{id}/events"))
        .json(&json!({"type": "teleport"}))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_session_id_is_bad_request() {
    let h = harness();
    h.server
        .get("/v1/sessions/not-a-uuid")
        .await
        .assert_status_bad_request();
}

// ============ Stateless endpoints ============

#[tokio::test]
async fn route_endpoint_returns_route() {
    let h = harness();

    let response = h
        .server
        .post("/v1/route")
        .json(&json!({
            "from": {"lat": 40.758, "lng": -73.9855},
            "to": {"lat": 40.7676, "lng": -73.9817},
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["route"]["distance_km"], 2.0);
    assert!(body["notice"].is_null());
}

#[tokio::test]
async fn route_endpoint_validates_points() {
    let h = harness();

    let response = h
        .server
        .post("/v1/route")
        .json(&json!({
            "from": {"lat": 95.0, "lng": -73.9855},
            "to": {"lat": 40.7676, "lng": -73.9817},
        }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(body["details"], json!(["Pickup: coordinates out of bounds."]));
    assert_eq!(h.router.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn local_fare_endpoint() {
    let h = harness();

    let response = h
        .server
        .post("/v1/fare/local")
        .json(&json!({"distance_km": 10.0, "passengers": 3}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["estimate"], 22.0);

    h.server
        .post("/v1/fare/local")
        .json(&json!({"distance_km": 1.0, "passengers": 0}))
        .await
        .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    h.server
        .post("/v1/fare/local")
        .json(&json!({"distance_km": -1.0}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn remote_fare_endpoint() {
    let h = harness();

    let response = h
        .server
        .post("/v1/fare/remote")
        .json(&json!({
            "pickup": {"lat": 40.758, "lng": -73.9855},
            "dropoff": {"lat": 40.7676, "lng": -73.9817},
            "passengers": 4,
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["fare"], 12.5);
    assert_eq!(body["fare_key"], "fare");
    assert_eq!(body["endpoint"], "https://fares.test/predict");
    assert_eq!(body["response"]["passengers"], 4);
}

#[tokio::test]
async fn remote_fare_disabled_is_unavailable() {
    let h = harness_with(StubRouter::default(), false);

    let response = h
        .server
        .post("/v1/fare/remote")
        .json(&json!({
            "pickup": {"lat": 40.758, "lng": -73.9855},
            "dropoff": {"lat": 40.7676, "lng": -73.9817},
        }))
        .await;

    response.assert_status_service_unavailable();
    assert_eq!(h.predictor.calls.load(Ordering::SeqCst), 0);
}
