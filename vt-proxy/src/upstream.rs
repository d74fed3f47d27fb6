//! Eden AI detection API client
//!
//! One outbound POST per proxied request, no retries. The bearer credential
//! is resolved from configuration on every call.

use axum::body::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use vt_common::config::{resolve_api_key, UpstreamConfig};
use vt_common::detection::{AnalysisRequest, DetectionKind};

const USER_AGENT: &str = concat!("VeriText-Proxy/", env!("CARGO_PKG_VERSION"));

/// Outbound request failure
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// Upstream answered with a non-2xx status
    #[error("API error {status}")]
    Status { status: u16, details: Value },

    /// No response received (connect, TLS, body read)
    #[error("Network error: {0}")]
    Transport(String),
}

/// Body sent to `/v2/text/*_detection`
#[derive(Debug, Serialize)]
struct OutboundRequest<'a> {
    providers: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    fallback_providers: &'static str,
}

/// Eden AI API client
pub struct EdenAiClient {
    http_client: reqwest::Client,
    config: UpstreamConfig,
}

impl EdenAiClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamFailure> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| UpstreamFailure::Transport(e.to_string()))?;

        Ok(Self { http_client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint_url(&self, kind: DetectionKind) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            kind.upstream_path()
        )
    }

    /// Forward one validated request; the success body is returned untouched
    pub async fn forward(&self, kind: DetectionKind, request: &AnalysisRequest) -> Result<Bytes, UpstreamFailure> {
        let api_key = resolve_api_key(&self.config).unwrap_or_else(|| {
            warn!("No Eden AI API key configured; sending request without credentials");
            String::new()
        });

        let body = OutboundRequest {
            providers: kind.providers(),
            text: &request.text,
            title: match kind {
                DetectionKind::Plagiarism => Some(request.effective_title()),
                DetectionKind::AiDetection => None,
            },
            fallback_providers: "",
        };

        let url = self.endpoint_url(kind);
        debug!(url = %url, providers = kind.providers(), "Calling detection API");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamFailure::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            let details = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(UpstreamFailure::Status {
                status: status.as_u16(),
                details,
            });
        }

        debug!(status = status.as_u16(), bytes = bytes.len(), "Detection API responded");
        Ok(bytes)
    }
}
