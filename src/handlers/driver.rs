use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::AppState;
use crate::drivers::DriverLocation;
use crate::error::{AppError, AppResult};
use crate::utils::geo::GeoCoordinate;

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// List drivers around a point
pub async fn nearby_drivers(
    State(state): State<AppState>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> AppResult<Json<Vec<DriverLocation>>> {
    let Query(query) = query?;
    let (Some(latitude), Some(longitude)) = (query.latitude, query.longitude) else {
        return Err(AppError::BadRequest(
            "latitude and longitude are required".to_string(),
        ));
    };

    let around = GeoCoordinate::new(latitude, longitude)?;
    let drivers = state.drivers.nearby(around).await?;

    Ok(Json(drivers))
}
