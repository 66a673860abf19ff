//! Integration tests for the OSRM client (wiremock-based)

use domain::{GeoPoint, RouteProfile};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_routing::{OsrmClient, RoutingClient, RoutingConfig, RoutingError};

const ROUTE_PATH: &str = "/route/v1/driving/-73.9855,40.758;-73.9817,40.7676";

fn config_for_mock(base_url: &str) -> RoutingConfig {
    RoutingConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        cache_ttl_secs: 0,
        ..RoutingConfig::default()
    }
}

fn pickup() -> GeoPoint {
    GeoPoint::times_square()
}

fn dropoff() -> GeoPoint {
    GeoPoint::central_park_south()
}

const fn sample_route_json() -> &'static str {
    r#"{
        "code": "Ok",
        "routes": [{
            "distance": 1834.6,
            "duration": 312.9,
            "weight": 312.9,
            "weight_name": "routability",
            "geometry": {
                "type": "LineString",
                "coordinates": [
                    [-73.985502, 40.758003],
                    [-73.984116, 40.759911],
                    [-73.981701, 40.767598]
                ]
            },
            "legs": []
        }],
        "waypoints": []
    }"#
}

#[tokio::test]
async fn test_route_success_swaps_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .and(query_param("geometries", "geojson"))
        .and(query_param("overview", "full"))
        .and(header("user-agent", "TripFare/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for_mock(&server.uri())).unwrap();
    let route = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap();

    assert!((route.distance_km - 1.8346).abs() < 1e-9);
    assert!((route.duration_min - 312.9 / 60.0).abs() < 1e-9);
    assert!(route.is_routed());

    let expected: [[f64; 2]; 3] = [
        [-73.985_502, 40.758_003],
        [-73.984_116, 40.759_911],
        [-73.981_701, 40.767_598],
    ];
    assert_eq!(route.path.len(), expected.len());
    for (point, [lng, lat]) in route.path.iter().zip(expected) {
        assert_eq!(point.lat().to_bits(), lat.to_bits());
        assert_eq!(point.lng().to_bits(), lng.to_bits());
    }
}

#[tokio::test]
async fn test_route_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "10"))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RoutingError::RateLimitExceeded {
            retry_after_secs: Some(10)
        }
    ));
}

#[tokio::test]
async fn test_route_server_error_is_transport() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap_err();

    assert!(matches!(err, RoutingError::RequestFailed(_)));
    assert!(!err.is_malformed());
}

#[tokio::test]
async fn test_route_code_not_ok_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"code": "NoRoute", "message": "Impossible route"}"#),
        )
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap_err();

    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_route_invalid_json_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap_err();

    assert!(matches!(err, RoutingError::ParseError(_)));
}

#[tokio::test]
async fn test_identical_requests_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = RoutingConfig {
        cache_ttl_secs: 300,
        ..config_for_mock(&server.uri())
    };
    let client = OsrmClient::new(&config).unwrap();

    let first = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap();
    let second = client
        .route(RouteProfile::Driving, pickup(), dropoff())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let config = RoutingConfig {
        cache_ttl_secs: 300,
        ..config_for_mock(&server.uri())
    };
    let client = OsrmClient::new(&config).unwrap();

    assert!(client.route(RouteProfile::Driving, pickup(), dropoff()).await.is_err());
    assert!(client.route(RouteProfile::Driving, pickup(), dropoff()).await.is_err());
}

#[tokio::test]
async fn test_walking_profile_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route/v1/walking/-73.9855,40.758;-73.9817,40.7676"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OsrmClient::new(&config_for_mock(&server.uri())).unwrap();
    assert!(
        client
            .route(RouteProfile::Walking, pickup(), dropoff())
            .await
            .is_ok()
    );
}
