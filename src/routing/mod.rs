pub mod provider;
pub mod service;
pub mod types;

pub use provider::{DirectionsProvider, GoogleDirectionsClient};
pub use service::RoutePricingService;
pub use types::{RouteRequest, RouteResult, RouteSelectionPolicy};
