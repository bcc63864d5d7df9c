use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ride_quote_backend::{
    AppResult, AppState,
    config::Config,
    drivers::SimulatedDriverLocations,
    error::AppError,
    pricing::FareCalculator,
    routes,
    routing::{GoogleDirectionsClient, RoutePricingService},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ride_quote_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(?config, "Starting server at {}", config.server_addr());

    let directions = GoogleDirectionsClient::from_config(&config)?;
    let pricing = RoutePricingService::new(Arc::new(directions), FareCalculator::new(config.fare))
        .with_precision(config.polyline_precision);

    let state = AppState {
        pricing,
        drivers: Arc::new(SimulatedDriverLocations::default()),
    };

    // Create router with middleware
    let app = routes::create_app(state)?;

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))
}
