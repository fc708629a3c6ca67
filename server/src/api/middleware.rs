//! Request fallbacks

use axum::extract::Request;

use super::types::ApiError;

/// Fallback for unmatched routes
pub async fn handle_404(req: Request) -> ApiError {
    tracing::debug!("[404] {} {}", req.method(), req.uri());
    ApiError::not_found("Not found.")
}
