//! vt-proxy library - detection request proxy
//!
//! Forwards AI-detection and plagiarism requests to the Eden AI API and
//! relays the response with status-code translation.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod upstream;

pub use crate::error::{ApiError, ApiResult};
use crate::upstream::EdenAiClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Outbound detection API client (pooled connections, read-only config)
    pub upstream: Arc<EdenAiClient>,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(upstream: EdenAiClient, max_body_bytes: usize) -> Self {
        Self {
            upstream: Arc::new(upstream),
            max_body_bytes,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        .merge(api::detect_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        // Browser front ends are served from another origin
        .layer(CorsLayer::permissive())
}
