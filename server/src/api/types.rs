//! Shared API types
//!
//! Every error leaves the API as `{"error": "<message>"}` with a status that
//! reflects where it came from: validation (400), upstream fetch (500),
//! shutdown (503) or request timeout (504).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::pageviews::{FetchError, InputError};

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
    ServiceUnavailable { message: String },
    GatewayTimeout { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::GatewayTimeout {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        tracing::debug!(error = %e, "Rejected request");
        Self::bad_request(e.to_string())
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Cancelled => Self::service_unavailable("Server is shutting down."),
            e => {
                tracing::error!(error = ?e, "Upstream fetch failed");
                Self::internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::Internal { message }
            | Self::ServiceUnavailable { message }
            | Self::GatewayTimeout { message } => message,
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_input_error_is_bad_request() {
        let (status, body) = body_json(InputError::InvalidDuration.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Invalid duration. Please select either 'week' or 'month'."
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_error_is_internal() {
        let (status, body) = body_json(FetchError::UnexpectedStatus(502).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "error": "Unexpected status code: 502" })
        );

        let (status, body) =
            body_json(FetchError::MaxRetriesExceeded { attempts: 3 }.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Max retries reached.");
    }

    #[tokio::test]
    async fn test_cancelled_is_service_unavailable() {
        let (status, body) = body_json(FetchError::Cancelled.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_gateway_timeout() {
        let (status, body) = body_json(ApiError::gateway_timeout("Request timed out.")).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "Request timed out.");
    }
}
