use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppResult;
use crate::routing::RouteResult;
use crate::utils::geo::GeoCoordinate;

/// Both endpoints are optional on the wire so a missing one surfaces as an
/// `invalid_request` error rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub origin: Option<GeoCoordinate>,
    pub destination: Option<GeoCoordinate>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub route: RouteResult,
    pub quoted_at: DateTime<Utc>,
}

/// Plan a route between two points and quote its fare
pub async fn quote_route(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> AppResult<Json<QuoteResponse>> {
    let Json(payload) = payload?;

    let route = state
        .pricing
        .plan_route(payload.origin, payload.destination)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, kind = e.kind(), "Route quote failed"))?;

    Ok(Json(QuoteResponse {
        route,
        quoted_at: Utc::now(),
    }))
}
