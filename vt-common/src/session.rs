//! Client submission session
//!
//! Single-user state machine driving one submission at a time:
//!
//! ```text
//! Idle ─submit─▶ Submitting ─┬─▶ Success(result)
//!                            ├─▶ FallbackError(message)   (mode switches to Fallback)
//!                            └─▶ Error(kind)
//! any terminal state ─submit─▶ Submitting
//! ```
//!
//! `submit` takes `&mut self`, so a second submission cannot start while one
//! is in flight. In fallback mode the backend is never called.

use crate::detection::fallback::{simulate_ai_detection, simulate_plagiarism};
use crate::detection::normalizer::{normalize_ai, normalize_plagiarism, DisplayResult, ResultOrigin};
use crate::detection::{AiDetectionEnvelope, AnalysisRequest, DetectionKind, PlagiarismEnvelope, MIN_TEXT_CHARS};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown when the detection API reports exhausted credits
pub const CREDITS_EXHAUSTED_MESSAGE: &str =
    "API credits exhausted. Enable fallback mode for testing, or add more credits to your Eden AI account.";

/// Client-side view of a failed submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Input rejected, locally or by the proxy (400)
    #[error("{0}")]
    Validation(String),

    /// Upstream billing limit reached (402)
    #[error("API credits exhausted")]
    CreditsExhausted,

    /// Non-2xx from the proxy or provider
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// No response received
    #[error("{0}")]
    Transport(String),

    /// Response held no usable provider result
    #[error("Could not analyze the text. Please try again.")]
    NoResult,
}

/// Source of live detection envelopes
#[async_trait]
pub trait DetectionBackend: Send + Sync {
    async fn detect_ai(&self, request: &AnalysisRequest) -> Result<AiDetectionEnvelope, ClientError>;

    async fn detect_plagiarism(&self, request: &AnalysisRequest) -> Result<PlagiarismEnvelope, ClientError>;
}

/// Whether submissions go to the backend or to the fallback simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    #[default]
    Live,
    Fallback,
}

/// Submission state
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Success(DisplayResult),
    /// Credits exhausted; mode was switched to fallback
    FallbackError(String),
    Error(ClientError),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionState::Idle | SubmissionState::Submitting)
    }
}

/// One user's analysis session
pub struct AnalysisSession<B> {
    backend: B,
    mode: DetectionMode,
    state: SubmissionState,
}

impl<B: DetectionBackend> AnalysisSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mode: DetectionMode::Live,
            state: SubmissionState::Idle,
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Manual mode selection; allowed at any time
    pub fn set_mode(&mut self, mode: DetectionMode) {
        if self.mode != mode {
            info!(?mode, "Detection mode changed");
        }
        self.mode = mode;
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one submission to a terminal state
    pub async fn submit(&mut self, kind: DetectionKind, request: AnalysisRequest) -> &SubmissionState {
        self.state = SubmissionState::Submitting;

        if request.validate().is_err() {
            self.state = SubmissionState::Error(ClientError::Validation(format!(
                "Please enter at least {} characters for accurate analysis.",
                MIN_TEXT_CHARS
            )));
            return &self.state;
        }

        let outcome = match self.mode {
            DetectionMode::Fallback => {
                debug!(?kind, "Using fallback mode with simulated data");
                simulate(kind, &request.text)
            }
            DetectionMode::Live => self.run_live(kind, &request).await,
        };

        self.state = match outcome {
            Ok(result) => SubmissionState::Success(result),
            Err(ClientError::CreditsExhausted) => {
                warn!("Detection API credits exhausted, switching to fallback mode");
                self.mode = DetectionMode::Fallback;
                SubmissionState::FallbackError(CREDITS_EXHAUSTED_MESSAGE.to_string())
            }
            Err(err) => SubmissionState::Error(err),
        };
        &self.state
    }

    async fn run_live(&self, kind: DetectionKind, request: &AnalysisRequest) -> Result<DisplayResult, ClientError> {
        match kind {
            DetectionKind::AiDetection => {
                let envelope = self.backend.detect_ai(request).await?;
                normalize_ai(&envelope, ResultOrigin::Live)
                    .map(DisplayResult::Ai)
                    .ok_or(ClientError::NoResult)
            }
            DetectionKind::Plagiarism => {
                let envelope = self.backend.detect_plagiarism(request).await?;
                normalize_plagiarism(&envelope, ResultOrigin::Live)
                    .map(DisplayResult::Plagiarism)
                    .ok_or(ClientError::NoResult)
            }
        }
    }
}

/// Normalized result from the fallback simulator
fn simulate(kind: DetectionKind, text: &str) -> Result<DisplayResult, ClientError> {
    match kind {
        DetectionKind::AiDetection => normalize_ai(&simulate_ai_detection(text), ResultOrigin::Simulated)
            .map(DisplayResult::Ai)
            .ok_or(ClientError::NoResult),
        DetectionKind::Plagiarism => normalize_plagiarism(&simulate_plagiarism(text), ResultOrigin::Simulated)
            .map(DisplayResult::Plagiarism)
            .ok_or(ClientError::NoResult),
    }
}
