//! HTTP backend talking to vt-proxy

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use vt_common::detection::{AiDetectionEnvelope, AnalysisRequest, DetectionKind, PlagiarismEnvelope};
use vt_common::session::{ClientError, DetectionBackend};

/// Where the proxy listens by default
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Used when an error response carries no `error` message
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze text. Please try again.";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Detection backend that posts to vt-proxy
pub struct ProxyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("VeriText-CLI/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: DeserializeOwned>(&self, kind: DetectionKind, request: &AnalysisRequest) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), kind.proxy_route());
        debug!(url = %url, chars = request.trimmed_len(), "Submitting to proxy");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Could not reach proxy at {}: {}", self.base_url, e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Transport(format!("Unreadable proxy response: {}", e)));
        }

        let message = response.json::<ErrorBody>().await.ok().and_then(|body| body.error);
        debug!(status = status.as_u16(), "Proxy returned an error");

        Err(match status.as_u16() {
            400 => ClientError::Validation(message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())),
            402 => ClientError::CreditsExhausted,
            code => ClientError::Upstream {
                status: code,
                message: message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            },
        })
    }
}

#[async_trait]
impl DetectionBackend for ProxyClient {
    async fn detect_ai(&self, request: &AnalysisRequest) -> Result<AiDetectionEnvelope, ClientError> {
        self.post(DetectionKind::AiDetection, request).await
    }

    async fn detect_plagiarism(&self, request: &AnalysisRequest) -> Result<PlagiarismEnvelope, ClientError> {
        self.post(DetectionKind::Plagiarism, request).await
    }
}
