//! vt-cli library - demo client for the VeriText proxy
//!
//! Submits text through the session state machine, either to vt-proxy or
//! to the local fallback simulator, and renders the display result.

pub mod client;
pub mod render;

use tracing::warn;
use vt_common::detection::normalizer::DisplayResult;
use vt_common::detection::{AnalysisRequest, DetectionKind};
use vt_common::session::{AnalysisSession, ClientError, DetectionBackend, SubmissionState};

pub use client::{ProxyClient, DEFAULT_PROXY_URL};

/// Result of one CLI analysis run
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub result: Result<DisplayResult, ClientError>,
    /// Set when credits ran out and the run was repeated in fallback mode
    pub fallback_notice: Option<String>,
}

/// Submit once; on credit exhaustion, re-submit in fallback mode
pub async fn analyze<B: DetectionBackend>(
    session: &mut AnalysisSession<B>,
    kind: DetectionKind,
    request: AnalysisRequest,
) -> AnalysisOutcome {
    let mut fallback_notice = None;

    let mut state = session.submit(kind, request.clone()).await.clone();
    if let SubmissionState::FallbackError(message) = &state {
        warn!("Credits exhausted, repeating submission with simulated data");
        fallback_notice = Some(message.clone());
        state = session.submit(kind, request).await.clone();
    }

    let result = match state {
        SubmissionState::Success(result) => Ok(result),
        SubmissionState::Error(err) => Err(err),
        // Fallback mode never reaches the backend, so a second 402 cannot happen
        SubmissionState::FallbackError(_) | SubmissionState::Idle | SubmissionState::Submitting => {
            Err(ClientError::NoResult)
        }
    };

    AnalysisOutcome {
        result,
        fallback_notice,
    }
}
