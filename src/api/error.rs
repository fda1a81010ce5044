//! HTTP error responses
//!
//! Every failure answers `{"status":"error","detail":..}`. Caller mistakes
//! map to 4xx with a short `detail`; everything else is logged
//! server-side and returned as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};
use crate::utils::errors::{DramamuError, ErrorSeverity};
use crate::utils::logging::log_api_error;

#[derive(Debug)]
pub struct ApiError(DramamuError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DramamuError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DramamuError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DramamuError::IdentityMismatch { .. } => StatusCode::FORBIDDEN,
            DramamuError::MovieNotFound { .. } => StatusCode::NOT_FOUND,
            DramamuError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match &self.0 {
            DramamuError::InvalidInput(message) | DramamuError::Authentication(message) => message.clone(),
            DramamuError::IdentityMismatch { .. } => "User ID mismatch".to_string(),
            DramamuError::MovieNotFound { .. } => "Movie not found".to_string(),
            DramamuError::RateLimitExceeded => "Rate limit exceeded".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<DramamuError> for ApiError {
    fn from(error: DramamuError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match self.0.severity() {
                ErrorSeverity::Critical => error!(error = %self.0, "Request failed on a critical error"),
                _ => log_api_error("http", &self.0.to_string(), None),
            }
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        (status, Json(json!({ "status": "error", "detail": self.detail() }))).into_response()
    }
}
