use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use ride_quote_backend::{
    AppState, RoutingError,
    drivers::SimulatedDriverLocations,
    pricing::FareCalculator,
    routes::create_router,
    routing::{DirectionsProvider, RoutePricingService, RouteRequest},
};

const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

struct FixedDirections(Result<String, RoutingError>);

#[async_trait]
impl DirectionsProvider for FixedDirections {
    async fn fetch_directions(&self, _request: &RouteRequest) -> Result<String, RoutingError> {
        self.0.clone()
    }
}

fn app(reply: Result<String, RoutingError>) -> Router {
    let pricing = RoutePricingService::new(
        Arc::new(FixedDirections(reply)),
        FareCalculator::default(),
    );
    create_router(AppState {
        pricing,
        drivers: Arc::new(SimulatedDriverLocations::default()),
    })
}

fn route_body() -> String {
    json!({
        "status": "OK",
        "routes": [{
            "overview_polyline": { "points": REFERENCE },
            "legs": [{ "distance": { "value": 2500 } }]
        }]
    })
    .to_string()
}

fn quote_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/routes/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_quote_returns_path_and_fare() {
    let (status, body) = send(
        app(Ok(route_body())),
        quote_request(json!({
            "origin": { "latitude": 38.5, "longitude": -120.2 },
            "destination": { "latitude": 43.252, "longitude": -126.453 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"].as_array().unwrap().len(), 3);
    assert_eq!(body["path"][0]["latitude"], 38.5);
    assert_eq!(body["path"][2]["longitude"], -126.453);
    assert_eq!(body["quote"]["distance_meters"], 2500.0);
    assert_eq!(body["quote"]["amount"], 7.5);
    assert!(body["quoted_at"].is_string());
}

#[tokio::test]
async fn test_quote_without_destination_is_bad_request() {
    let (status, body) = send(
        app(Ok(route_body())),
        quote_request(json!({ "origin": { "latitude": 38.5, "longitude": -120.2 } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_quote_error_kinds_map_to_statuses() {
    let request = || {
        quote_request(json!({
            "origin": { "latitude": 0.0, "longitude": 0.0 },
            "destination": { "latitude": 1.0, "longitude": 1.0 }
        }))
    };

    let cases = [
        (
            Ok(json!({ "routes": [] }).to_string()),
            StatusCode::NOT_FOUND,
            "no_route_found",
        ),
        (
            Err(RoutingError::ProviderUnavailable("timeout".to_string())),
            StatusCode::SERVICE_UNAVAILABLE,
            "provider_unavailable",
        ),
        (
            Ok("<html>".to_string()),
            StatusCode::BAD_GATEWAY,
            "provider_response_invalid",
        ),
    ];

    for (reply, expected_status, expected_kind) in cases {
        let (status, body) = send(app(reply), request()).await;
        assert_eq!(status, expected_status);
        assert_eq!(body["error"], expected_kind);
    }
}

#[tokio::test]
async fn test_nearby_drivers() {
    let request = Request::builder()
        .uri("/api/drivers/nearby?latitude=-23.5&longitude=-46.5")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Ok(route_body())), request).await;

    assert_eq!(status, StatusCode::OK);
    let drivers = body.as_array().unwrap();
    assert_eq!(drivers.len(), 3);
    assert_eq!(drivers[0]["id"], 1);
}

#[tokio::test]
async fn test_nearby_drivers_requires_coordinates() {
    let request = Request::builder()
        .uri("/api/drivers/nearby?latitude=-23.5")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Ok(route_body())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Ok(route_body())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_malformed_quote_body_is_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/routes/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"origin\": "))
        .unwrap();

    let (status, body) = send(app(Ok(route_body())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_quote_without_content_type_is_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/routes/quote")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let (status, body) = send(app(Ok(route_body())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_non_numeric_coordinate_is_json_error() {
    let request = Request::builder()
        .uri("/api/drivers/nearby?latitude=abc&longitude=1")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Ok(route_body())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}
