//! Detection request and response types
//!
//! Wire shapes follow the Eden AI `ai_detection` and `plagia_detection`
//! endpoints. AI-detection scores are on the 0–1 scale; the overall
//! plagiarism score is on the 0–100 scale while its candidates stay on 0–1.
//! The two scales are separate types so a value cannot be formatted on the
//! wrong one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fallback;
pub mod normalizer;

/// Minimum trimmed text length (in characters) accepted for analysis
pub const MIN_TEXT_CHARS: usize = 50;

/// Title sent upstream when the caller gives none
pub const DEFAULT_DOCUMENT_TITLE: &str = "Untitled Document";

/// Strip binary-fraction noise introduced by scaling (0.7 * 100 = 70.00000000000001)
fn strip_float_noise(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Score on the 0.0–1.0 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitScore(pub f64);

impl UnitScore {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_percent(self) -> PercentScore {
        PercentScore(strip_float_noise(self.0 * 100.0))
    }

    /// "0.85" → "85%"
    pub fn format_percentage(self) -> String {
        self.to_percent().format_percentage()
    }
}

/// Score on the 0–100 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentScore(pub f64);

impl PercentScore {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Rounded to the nearest whole percent: "100" → "100%"
    pub fn format_percentage(self) -> String {
        format!("{}%", self.0.round() as i64)
    }
}

/// Named third-party detection backend behind the Eden AI API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Sapling,
    WinstonAi,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Sapling => "sapling",
            Provider::WinstonAi => "winstonai",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider preference for AI detection, most preferred first
pub const AI_PROVIDER_PREFERENCE: [Provider; 2] = [Provider::WinstonAi, Provider::Sapling];

/// Provider preference for plagiarism detection
pub const PLAGIARISM_PROVIDER_PREFERENCE: [Provider; 1] = [Provider::WinstonAi];

/// The two detection domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionKind {
    AiDetection,
    Plagiarism,
}

impl DetectionKind {
    /// Route exposed by the proxy
    pub fn proxy_route(self) -> &'static str {
        match self {
            DetectionKind::AiDetection => "/api/detect-ai",
            DetectionKind::Plagiarism => "/api/detect-plagiarism",
        }
    }

    /// Path of the Eden AI endpoint, relative to the API base URL
    pub fn upstream_path(self) -> &'static str {
        match self {
            DetectionKind::AiDetection => "/v2/text/ai_detection",
            DetectionKind::Plagiarism => "/v2/text/plagia_detection",
        }
    }

    /// Comma-separated provider list sent upstream
    pub fn providers(self) -> &'static str {
        match self {
            DetectionKind::AiDetection => "sapling,winstonai",
            DetectionKind::Plagiarism => "winstonai",
        }
    }
}

/// Input text shorter than [`MIN_TEXT_CHARS`] after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Text must be at least {min} characters long")]
pub struct TextTooShort {
    pub min: usize,
    pub actual: usize,
}

/// One user submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Missing `text` deserializes as empty and fails validation
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Character count of the trimmed text
    pub fn trimmed_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    pub fn validate(&self) -> Result<(), TextTooShort> {
        let actual = self.trimmed_len();
        if actual < MIN_TEXT_CHARS {
            return Err(TextTooShort {
                min: MIN_TEXT_CHARS,
                actual,
            });
        }
        Ok(())
    }

    /// Title with empty or absent values replaced by the default
    pub fn effective_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_DOCUMENT_TITLE,
        }
    }
}

/// Per-segment AI label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiLabel {
    AiGenerated,
    HumanWritten,
    #[serde(other)]
    Unknown,
}

/// Per-candidate plagiarism label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlagiarismLabel {
    Plagiarized,
    Original,
    #[serde(other)]
    Unknown,
}

/// Sentence-level AI-detection sub-result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSegmentItem {
    pub text: String,
    pub prediction: AiLabel,
    pub ai_score: UnitScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_score_detail: Option<f64>,
}

/// One provider's AI-detection result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiDetectionResult {
    #[serde(default)]
    pub ai_score: UnitScore,
    #[serde(default)]
    pub items: Vec<AiSegmentItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Matching external passage for one plagiarism item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub plagiarized_text: String,
    pub plagia_score: UnitScore,
    pub prediction: PlagiarismLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismItem {
    pub text: String,
    #[serde(default)]
    pub candidates: Vec<PlagiarismCandidate>,
}

/// One provider's plagiarism result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResult {
    #[serde(default)]
    pub plagia_score: PercentScore,
    #[serde(default)]
    pub items: Vec<PlagiarismItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Multi-provider envelope returned by `ai_detection`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiDetectionEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sapling: Option<AiDetectionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winstonai: Option<AiDetectionResult>,
}

/// Envelope returned by `plagia_detection`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winstonai: Option<PlagiarismResult>,
}

/// Access to per-provider results inside an envelope
pub trait ProviderEnvelope {
    type Output;

    fn provider_result(&self, provider: Provider) -> Option<&Self::Output>;
}

impl ProviderEnvelope for AiDetectionEnvelope {
    type Output = AiDetectionResult;

    fn provider_result(&self, provider: Provider) -> Option<&AiDetectionResult> {
        match provider {
            Provider::Sapling => self.sapling.as_ref(),
            Provider::WinstonAi => self.winstonai.as_ref(),
        }
    }
}

impl ProviderEnvelope for PlagiarismEnvelope {
    type Output = PlagiarismResult;

    fn provider_result(&self, provider: Provider) -> Option<&PlagiarismResult> {
        match provider {
            Provider::Sapling => None,
            Provider::WinstonAi => self.winstonai.as_ref(),
        }
    }
}
