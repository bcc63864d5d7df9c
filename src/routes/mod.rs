use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::error::AppResult;
use crate::handlers::{driver, quote};
use crate::middleware::rate_limit::{create_public_governor, log_request};

pub fn create_router(state: AppState) -> Router {
    let route_routes = Router::new().route("/quote", post(quote::quote_route));

    let driver_routes = Router::new().route("/nearby", get(driver::nearby_drivers));

    // Combine all routes
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/routes", route_routes)
        .nest("/api/drivers", driver_routes)
        .with_state(state)
}

/// Router plus the edge layers. Needs `ConnectInfo<SocketAddr>` on every
/// request for per-IP rate limiting.
pub fn create_app(state: AppState) -> AppResult<Router> {
    Ok(create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(create_public_governor()?)
        // Outermost, so requests the governor rejects are logged too.
        .layer(middleware::from_fn(log_request)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
