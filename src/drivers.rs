use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::utils::geo::GeoCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverLocation {
    pub id: u32,
    pub location: GeoCoordinate,
}

/// Where available drivers currently are. Swap the implementation to plug in
/// a live fleet feed.
#[async_trait]
pub trait DriverLocationProvider: Send + Sync {
    async fn nearby(&self, around: GeoCoordinate) -> Result<Vec<DriverLocation>, RoutingError>;
}

/// Placeholder fleet: a few drivers at fixed offsets from the caller.
#[derive(Debug, Clone)]
pub struct SimulatedDriverLocations {
    offsets: Vec<(u32, f64, f64)>,
}

impl Default for SimulatedDriverLocations {
    fn default() -> Self {
        Self {
            offsets: vec![(1, 0.01, 0.01), (2, -0.01, -0.01), (3, 0.02, -0.02)],
        }
    }
}

#[async_trait]
impl DriverLocationProvider for SimulatedDriverLocations {
    async fn nearby(&self, around: GeoCoordinate) -> Result<Vec<DriverLocation>, RoutingError> {
        around.validate()?;

        // Offsets that would leave the valid range near the poles or the
        // antimeridian are dropped rather than wrapped.
        let drivers = self
            .offsets
            .iter()
            .filter_map(|&(id, d_lat, d_lng)| {
                GeoCoordinate::new(around.latitude + d_lat, around.longitude + d_lng)
                    .ok()
                    .map(|location| DriverLocation { id, location })
            })
            .collect();

        Ok(drivers)
    }
}
