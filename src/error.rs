use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the routing and pricing core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// Missing endpoint or coordinate out of range. Caller bug, not retryable.
    #[error("Invalid route request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure talking to the directions provider.
    #[error("Directions provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("No route found between origin and destination")]
    NoRouteFound,

    /// The provider answered, but not in the shape we rely on.
    #[error("Invalid directions provider response: {0}")]
    ProviderResponseInvalid(String),

    #[error("Malformed encoded path: {0}")]
    DecodeError(String),

    #[error("Invalid distance: {0} meters")]
    InvalidDistance(f64),
}

impl RoutingError {
    /// Only transport failures are worth retrying with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RoutingError::ProviderUnavailable(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::InvalidRequest(_) => "invalid_request",
            RoutingError::ProviderUnavailable(_) => "provider_unavailable",
            RoutingError::NoRouteFound => "no_route_found",
            RoutingError::ProviderResponseInvalid(_) => "provider_response_invalid",
            RoutingError::DecodeError(_) => "decode_error",
            RoutingError::InvalidDistance(_) => "invalid_distance",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            RoutingError::InvalidRequest(_) | RoutingError::InvalidDistance(_) => {
                StatusCode::BAD_REQUEST
            }
            RoutingError::NoRouteFound => StatusCode::NOT_FOUND,
            RoutingError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RoutingError::ProviderResponseInvalid(_) | RoutingError::DecodeError(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// Errors surfaced by the HTTP layer and application startup.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::Routing(e) => (e.status_code(), e.kind()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let body = Json(json!({
            "error": kind,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_provider_unavailable_is_retryable() {
        assert!(RoutingError::ProviderUnavailable("timeout".into()).is_retryable());
        assert!(!RoutingError::NoRouteFound.is_retryable());
        assert!(!RoutingError::InvalidRequest("missing destination".into()).is_retryable());
        assert!(!RoutingError::DecodeError("truncated".into()).is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RoutingError::InvalidRequest(String::new()), StatusCode::BAD_REQUEST),
            (RoutingError::InvalidDistance(-1.0), StatusCode::BAD_REQUEST),
            (RoutingError::NoRouteFound, StatusCode::NOT_FOUND),
            (
                RoutingError::ProviderUnavailable(String::new()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RoutingError::ProviderResponseInvalid(String::new()),
                StatusCode::BAD_GATEWAY,
            ),
            (RoutingError::DecodeError(String::new()), StatusCode::BAD_GATEWAY),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).into_response().status(), status);
        }
    }
}
