use std::sync::Arc;
use std::time::Duration;

use crate::error::RoutingError;
use crate::pricing::FareCalculator;
use crate::routing::provider::DirectionsProvider;
use crate::routing::types::{
    DirectionsResponse, DirectionsRoute, RouteRequest, RouteResult, RouteSelectionPolicy,
};
use crate::utils::geo::{self, GeoCoordinate};
use crate::utils::polyline::{self, DEFAULT_PRECISION};

// Overview polylines are simplified, so the road distance should never be
// much shorter than the decoded path itself.
const PATH_LENGTH_TOLERANCE: f64 = 0.99;

/// Plans a route through the directions provider and prices it.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct RoutePricingService {
    provider: Arc<dyn DirectionsProvider>,
    fares: FareCalculator,
    precision: u32,
    selection: RouteSelectionPolicy,
}

impl RoutePricingService {
    pub fn new(provider: Arc<dyn DirectionsProvider>, fares: FareCalculator) -> Self {
        Self {
            provider,
            fares,
            precision: DEFAULT_PRECISION,
            selection: RouteSelectionPolicy::FirstCandidate,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub async fn plan_route(
        &self,
        origin: impl Into<Option<GeoCoordinate>>,
        destination: impl Into<Option<GeoCoordinate>>,
    ) -> Result<RouteResult, RoutingError> {
        let request = RouteRequest::new(origin.into(), destination.into())?;
        let body = self.provider.fetch_directions(&request).await?;
        self.price_response(&body)
    }

    /// Like [`plan_route`](Self::plan_route), but gives up on the provider
    /// after `deadline` with [`RoutingError::ProviderUnavailable`].
    pub async fn plan_route_within(
        &self,
        origin: impl Into<Option<GeoCoordinate>>,
        destination: impl Into<Option<GeoCoordinate>>,
        deadline: Duration,
    ) -> Result<RouteResult, RoutingError> {
        let request = RouteRequest::new(origin.into(), destination.into())?;
        let body = tokio::time::timeout(deadline, self.provider.fetch_directions(&request))
            .await
            .map_err(|_| {
                tracing::warn!(?deadline, "Directions request exceeded deadline");
                RoutingError::ProviderUnavailable(format!("no response within {:?}", deadline))
            })??;
        self.price_response(&body)
    }

    fn price_response(&self, body: &str) -> Result<RouteResult, RoutingError> {
        let response: DirectionsResponse = serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, body, "Failed to parse directions response");
            RoutingError::ProviderResponseInvalid(e.to_string())
        })?;

        check_status(&response)?;

        let routes = response.routes.as_deref().ok_or_else(|| {
            tracing::error!(body, "Directions response has no routes field");
            RoutingError::ProviderResponseInvalid("missing field `routes`".to_string())
        })?;

        let candidate = self
            .selection
            .select(routes)
            .ok_or(RoutingError::NoRouteFound)?;

        let route: DirectionsRoute = serde_json::from_value(candidate.clone()).map_err(|e| {
            tracing::error!(error = %e, "Selected route is missing required fields");
            RoutingError::ProviderResponseInvalid(format!("routes[0]: {}", e))
        })?;

        let leg = route.legs.first().ok_or_else(|| {
            tracing::error!("Selected route has no legs");
            RoutingError::ProviderResponseInvalid("routes[0].legs is empty".to_string())
        })?;

        let path = polyline::decode(&route.overview_polyline.points, self.precision)?;
        let quote = self.fares.quote(leg.distance.value)?;

        let path_length_km = geo::path_length_km(&path);
        if !distance_covers_path(quote.distance_meters, path_length_km) {
            tracing::warn!(
                distance_meters = quote.distance_meters,
                path_length_km,
                "Provider distance is shorter than the decoded path"
            );
        }

        tracing::debug!(
            points = path.len(),
            distance_meters = quote.distance_meters,
            path_length_km,
            amount = quote.amount,
            "Route priced"
        );

        Ok(RouteResult { path, quote })
    }
}

fn distance_covers_path(distance_meters: f64, path_length_km: f64) -> bool {
    distance_meters >= path_length_km * 1000.0 * PATH_LENGTH_TOLERANCE
}

/// Interpret the provider's own status field, when it sends one.
fn check_status(response: &DirectionsResponse) -> Result<(), RoutingError> {
    let Some(status) = response.status.as_deref() else {
        return Ok(());
    };
    let detail = response.error_message.as_deref().unwrap_or(status);

    match status {
        "OK" => Ok(()),
        "ZERO_RESULTS" | "NOT_FOUND" => Err(RoutingError::NoRouteFound),
        "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR" => {
            tracing::warn!(status, detail, "Directions provider temporarily unavailable");
            Err(RoutingError::ProviderUnavailable(detail.to_string()))
        }
        _ => {
            tracing::error!(status, detail, "Directions provider returned an error status");
            Err(RoutingError::ProviderResponseInvalid(format!(
                "{}: {}",
                status, detail
            )))
        }
    }
}
