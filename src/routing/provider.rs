use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::Config;
use crate::error::{AppError, AppResult, RoutingError};
use crate::routing::types::RouteRequest;

/// Source of raw directions responses. One call, one attempt.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Fetch the response body for `request`.
    ///
    /// Transport failures map to [`RoutingError::ProviderUnavailable`]. Parsing
    /// the body is left to the caller.
    async fn fetch_directions(&self, request: &RouteRequest) -> Result<String, RoutingError>;
}

/// Google-style Directions API over HTTPS.
pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleDirectionsClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            &config.directions_base_url,
            config.directions_api_key.clone(),
            config.directions_timeout,
        )
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    async fn fetch_directions(&self, request: &RouteRequest) -> Result<String, RoutingError> {
        let url = format!("{}/maps/api/directions/json", self.base_url);
        let origin = request.origin.to_query_value();
        let destination = request.destination.to_query_value();

        tracing::debug!(%origin, %destination, "Requesting directions");

        // Errors are stripped of their URL, which carries the API key.
        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::warn!(error = %e, %origin, %destination, "Directions request failed");
                RoutingError::ProviderUnavailable(e.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(error = %e, "Failed to read directions response body");
            RoutingError::ProviderUnavailable(e.to_string())
        })?;

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(%status, "Directions provider is unavailable");
            return Err(RoutingError::ProviderUnavailable(format!(
                "provider returned HTTP {}",
                status
            )));
        }
        if !status.is_success() {
            tracing::error!(%status, body = %text, "Directions provider rejected the request");
            return Err(RoutingError::ProviderResponseInvalid(format!(
                "provider returned HTTP {}",
                status
            )));
        }

        Ok(text)
    }
}
