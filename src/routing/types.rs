use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::pricing::FareQuote;
use crate::utils::geo::GeoCoordinate;

/// A validated origin/destination pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: GeoCoordinate,
    pub destination: GeoCoordinate,
}

impl RouteRequest {
    pub fn new(
        origin: Option<GeoCoordinate>,
        destination: Option<GeoCoordinate>,
    ) -> Result<Self, RoutingError> {
        let origin =
            origin.ok_or_else(|| RoutingError::InvalidRequest("origin is required".to_string()))?;
        let destination = destination
            .ok_or_else(|| RoutingError::InvalidRequest("destination is required".to_string()))?;

        origin
            .validate()
            .map_err(|e| RoutingError::InvalidRequest(format!("origin: {}", e)))?;
        destination
            .validate()
            .map_err(|e| RoutingError::InvalidRequest(format!("destination: {}", e)))?;

        Ok(Self {
            origin,
            destination,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Decoded route geometry, origin end first.
    pub path: Vec<GeoCoordinate>,
    pub quote: FareQuote,
}

/// Which of the provider's candidate routes gets priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteSelectionPolicy {
    /// First route in provider response order.
    #[default]
    FirstCandidate,
}

impl RouteSelectionPolicy {
    pub fn select<'a, T>(&self, candidates: &'a [T]) -> Option<&'a T> {
        match self {
            RouteSelectionPolicy::FirstCandidate => candidates.first(),
        }
    }
}

// --- Directions provider response shapes ---

/// Top-level envelope. Routes are kept raw so a malformed candidate we never
/// select cannot fail the whole response.
///
/// `routes` may be absent when `status` already explains why there are none.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    pub overview_polyline: OverviewPolyline,
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
pub struct OverviewPolyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsLeg {
    pub distance: LegDistance,
}

#[derive(Debug, Deserialize)]
pub struct LegDistance {
    /// Meters. Providers send an integer, but floats are accepted too.
    pub value: f64,
}
