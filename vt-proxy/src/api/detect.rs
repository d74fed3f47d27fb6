//! Detection proxy endpoints
//!
//! POST /api/detect-ai and POST /api/detect-plagiarism. Validation happens
//! before any outbound call; success bodies are relayed byte-for-byte.
//! Bodies are parsed as JSON whatever their `Content-Type`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use tracing::{info, warn};
use vt_common::detection::{AnalysisRequest, DetectionKind};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/detect-ai
///
/// Body `{text}`; forwards to providers `sapling,winstonai`.
pub async fn detect_ai(
    State(state): State<AppState>,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<impl IntoResponse> {
    proxy_detection(&state, DetectionKind::AiDetection, payload).await
}

/// POST /api/detect-plagiarism
///
/// Body `{text, title?}`; forwards to provider `winstonai`.
pub async fn detect_plagiarism(
    State(state): State<AppState>,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<impl IntoResponse> {
    proxy_detection(&state, DetectionKind::Plagiarism, payload).await
}

async fn proxy_detection(
    state: &AppState,
    kind: DetectionKind,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<([(header::HeaderName, &'static str); 1], Bytes)> {
    let body = payload.map_err(|rejection| reject_body(state, rejection))?;
    let request: AnalysisRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?;

    if let Err(e) = request.validate() {
        info!(route = kind.proxy_route(), chars = e.actual, "Rejected short input");
        return Err(ApiError::Validation(e.to_string()));
    }

    info!(
        route = kind.proxy_route(),
        chars = request.trimmed_len(),
        "Forwarding detection request"
    );

    match state.upstream.forward(kind, &request).await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, "application/json")], body)),
        Err(failure) => {
            let err = ApiError::from_upstream(kind, failure);
            warn!(route = kind.proxy_route(), status = err.status().as_u16(), "Detection failed: {}", err);
            Err(err)
        }
    }
}

/// Body could not be read; the size limit keeps its own status
fn reject_body(state: &AppState, rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            limit: state.max_body_bytes,
        }
    } else {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Build detection routes
pub fn detect_routes() -> Router<AppState> {
    Router::new()
        .route(DetectionKind::AiDetection.proxy_route(), post(detect_ai))
        .route(DetectionKind::Plagiarism.proxy_route(), post(detect_plagiarism))
}
