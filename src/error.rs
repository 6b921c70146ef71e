use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use serde::{Deserialize, Serialize};
use std::error::Error as _;

use crate::config::PROJECT_ID_VAR;

/// Error body: `{"error": {"message": "..."}}`
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// `forwarding` or `unconfigured`
    pub mode: String,
}

/// Custom error type for the chat route
///
/// Every variant renders the same JSON error shape, so clients only ever
/// have to look at `error.message`.
#[derive(Debug)]
pub enum ApiError {
    /// No project id was configured at startup
    MissingProjectId,
    /// The inbound body could not be buffered: over the size limit (413)
    /// or broken off by the client (400)
    RequestBody(axum::Error),
    /// Upstream unreachable, TLS failure or timeout
    Upstream(reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingProjectId => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RequestBody(err) if is_length_limit(err) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MissingProjectId => format!("Missing {} for dev proxy", PROJECT_ID_VAR),
            ApiError::RequestBody(err) => format!("Request body could not be read: {}", err),
            ApiError::Upstream(err) => format!("Upstream request failed: {}", err),
        }
    }
}

fn is_length_limit(err: &axum::Error) -> bool {
    std::iter::successors(err.source(), |&e| e.source()).any(|e| e.is::<LengthLimitError>())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.message()));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_project_id_response() {
        let response = ApiError::MissingProjectId.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": { "message": "Missing REACT_APP_FIREBASE_PROJECT_ID for dev proxy" }
            })
        );
    }

    #[test]
    fn test_aborted_body_is_bad_request() {
        let aborted = std::io::Error::other("connection reset");
        let err = ApiError::RequestBody(axum::Error::new(aborted));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("connection reset"));
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_string(&ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, r#"{"error":{"message":"boom"}}"#);
    }
}
