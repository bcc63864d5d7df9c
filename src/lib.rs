pub mod config;
pub mod drivers;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pricing;
pub mod routes;
pub mod routing;
pub mod utils;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, AppResult, RoutingError};

use drivers::DriverLocationProvider;
use routing::RoutePricingService;

#[derive(Clone)]
pub struct AppState {
    pub pricing: RoutePricingService,
    pub drivers: Arc<dyn DriverLocationProvider>,
}
