//! Error types for vt-proxy
//!
//! Every failure is converted into a JSON response; nothing here is fatal
//! to the running process.

use crate::upstream::UpstreamFailure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use vt_common::detection::DetectionKind;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input rejected before any outbound call (400)
    #[error("{0}")]
    Validation(String),

    /// Request body above the configured size limit (413)
    #[error("Request body exceeds the {limit}-byte limit")]
    PayloadTooLarge { limit: usize },

    /// Upstream billing limit reached (402)
    #[error("API credits exhausted")]
    CreditsExhausted { details: Value },

    /// Non-2xx from the detection API, relayed with its status
    #[error("Eden AI API error ({status})")]
    Upstream { status: StatusCode, details: Value },

    /// No response from the detection API (500)
    #[error("{context}: {message}")]
    Transport { context: &'static str, message: String },
}

impl ApiError {
    /// Translate an outbound failure for the given route
    pub fn from_upstream(kind: DetectionKind, failure: UpstreamFailure) -> Self {
        match failure {
            UpstreamFailure::Status { status: 402, details } => ApiError::CreditsExhausted { details },
            UpstreamFailure::Status { status, details } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                details,
            },
            UpstreamFailure::Transport(message) => ApiError::Transport {
                context: failure_context(kind),
                message,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::CreditsExhausted { .. } => StatusCode::PAYMENT_REQUIRED,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn failure_context(kind: DetectionKind) -> &'static str {
    match kind {
        DetectionKind::AiDetection => "Failed to detect AI content",
        DetectionKind::Plagiarism => "Failed to detect plagiarism",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            ApiError::Validation(_) | ApiError::PayloadTooLarge { .. } => json!({ "error": message }),
            ApiError::CreditsExhausted { details } => json!({
                "error": "API credits exhausted",
                "details": details,
                "status": 402,
            }),
            ApiError::Upstream { status, details } => json!({
                "error": "Eden AI API error",
                "details": details,
                "status": status.as_u16(),
            }),
            ApiError::Transport { context, message } => json!({
                "error": context,
                "message": message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_required_maps_to_credits_exhausted() {
        let err = ApiError::from_upstream(
            DetectionKind::Plagiarism,
            UpstreamFailure::Status { status: 402, details: json!({"detail": "no credits"}) },
        );
        assert!(matches!(err, ApiError::CreditsExhausted { .. }));
        assert_eq!(err.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_other_status_is_relayed() {
        let err = ApiError::from_upstream(
            DetectionKind::AiDetection,
            UpstreamFailure::Status { status: 429, details: Value::Null },
        );
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_oversized_body_is_413() {
        let err = ApiError::PayloadTooLarge { limit: 100 };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "Request body exceeds the 100-byte limit");
    }

    #[test]
    fn test_transport_uses_route_context() {
        let err = ApiError::from_upstream(
            DetectionKind::Plagiarism,
            UpstreamFailure::Transport("connection refused".to_string()),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to detect plagiarism: connection refused");
    }
}
