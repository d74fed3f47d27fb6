//! Result normalization
//!
//! Turns a raw multi-provider envelope into a display result: picks one
//! provider by preference order, scales the score, classifies it against a
//! fixed threshold and derives the summary strings shown to the user.

use super::{
    AiDetectionEnvelope, AiDetectionResult, AiLabel, PercentScore, PlagiarismCandidate,
    PlagiarismEnvelope, PlagiarismResult, Provider, ProviderEnvelope, AI_PROVIDER_PREFERENCE,
    PLAGIARISM_PROVIDER_PREFERENCE,
};
use serde::Serialize;

/// Percentage strictly above which text is classified AI-generated
pub const AI_THRESHOLD_PERCENT: f64 = 70.0;

/// Plagiarism percentage above which the document is flagged
pub const PLAGIARISM_FLAG_PERCENT: f64 = 30.0;

/// Plagiarism percentage above which the document needs a closer look
pub const PLAGIARISM_CAUTION_PERCENT: f64 = 10.0;

/// Where a display result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrigin {
    /// Returned by the detection API
    Live,
    /// Produced locally by the fallback simulator
    Simulated,
}

/// Confidence bucket for an AI percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
}

impl Confidence {
    /// Bands are checked tightest first: >90/<10, then >75/<25
    pub fn for_percent(score: PercentScore) -> Self {
        let pct = score.value();
        if pct > 90.0 || pct < 10.0 {
            Confidence::VeryHigh
        } else if pct > 75.0 || pct < 25.0 {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Confidence::VeryHigh => "Very High",
            Confidence::High => "High",
            Confidence::Medium => "Medium",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Plagiarism severity band (drives the color of the score bar)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn for_percent(score: PercentScore) -> Self {
        let pct = score.value();
        if pct > PLAGIARISM_FLAG_PERCENT {
            Severity::High
        } else if pct > PLAGIARISM_CAUTION_PERCENT {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

/// `>` comparison, no hysteresis
pub fn is_ai_generated(score: PercentScore) -> bool {
    score.value() > AI_THRESHOLD_PERCENT
}

/// First provider in `preference` with a usable result
///
/// A provider entry whose status is `"fail"` carries no score and is skipped.
pub fn select_provider<'a, E>(envelope: &'a E, preference: &[Provider]) -> Option<(Provider, &'a E::Output)>
where
    E: ProviderEnvelope,
    E::Output: ProviderStatus,
{
    preference.iter().find_map(|&provider| {
        envelope
            .provider_result(provider)
            .filter(|result| !result.is_failed())
            .map(|result| (provider, result))
    })
}

/// Per-provider status reported by Eden AI
pub trait ProviderStatus {
    fn status(&self) -> Option<&str>;

    fn is_failed(&self) -> bool {
        self.status() == Some("fail")
    }
}

impl ProviderStatus for AiDetectionResult {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl ProviderStatus for PlagiarismResult {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Sentence-level AI segment, scaled for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySegment {
    pub text: String,
    pub is_ai: bool,
    pub score: PercentScore,
}

/// Display projection of an AI-detection result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiDisplayResult {
    pub provider: Provider,
    pub score: PercentScore,
    pub is_ai: bool,
    pub confidence: Confidence,
    pub details: Vec<String>,
    pub segments: Vec<DisplaySegment>,
    /// Whole percent of segments labeled AI-generated
    pub segment_share: u32,
    pub origin: ResultOrigin,
}

impl AiDisplayResult {
    pub fn verdict(&self) -> &'static str {
        if self.is_ai {
            "AI-Generated"
        } else {
            "Human-Written"
        }
    }
}

/// Source item and its matching candidates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMatches {
    pub text: String,
    pub matches: Vec<PlagiarismCandidate>,
}

/// Display projection of a plagiarism result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlagiarismDisplayResult {
    pub provider: Provider,
    pub score: PercentScore,
    pub severity: Severity,
    pub assessment: &'static str,
    pub sources: Vec<SourceMatches>,
    pub total_matches: usize,
    pub cost: Option<f64>,
    pub origin: ResultOrigin,
}

/// Either kind of display result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayResult {
    Ai(AiDisplayResult),
    Plagiarism(PlagiarismDisplayResult),
}

impl DisplayResult {
    pub fn origin(&self) -> ResultOrigin {
        match self {
            DisplayResult::Ai(result) => result.origin,
            DisplayResult::Plagiarism(result) => result.origin,
        }
    }
}

/// round(ai / total * 100); an empty list yields 0
pub fn ai_segment_share(segments: &[DisplaySegment]) -> u32 {
    if segments.is_empty() {
        return 0;
    }
    let ai = segments.iter().filter(|s| s.is_ai).count();
    ((ai as f64 / segments.len() as f64) * 100.0).round() as u32
}

/// Normalize an AI-detection envelope (winstonai preferred over sapling)
///
/// Returns None when no provider in the envelope produced a result.
pub fn normalize_ai(envelope: &AiDetectionEnvelope, origin: ResultOrigin) -> Option<AiDisplayResult> {
    let (provider, result) = select_provider(envelope, &AI_PROVIDER_PREFERENCE)?;

    let score = result.ai_score.to_percent();
    let is_ai = is_ai_generated(score);

    let segments: Vec<DisplaySegment> = result
        .items
        .iter()
        .map(|item| DisplaySegment {
            text: item.text.clone(),
            is_ai: item.prediction == AiLabel::AiGenerated,
            score: item.ai_score.to_percent(),
        })
        .collect();
    let segment_share = ai_segment_share(&segments);

    let details = if is_ai {
        vec![
            "Statistical patterns consistent with AI generation".to_string(),
            "Consistent tone and style throughout text".to_string(),
        ]
    } else {
        vec![
            "Natural language variations typical of human writing".to_string(),
            "Subtle style shifts throughout content".to_string(),
        ]
    };
    let details = details
        .into_iter()
        .chain([
            format!("{}% of text segments show AI patterns", segment_share),
            format!("Overall AI probability score: {:.1}%", score.value()),
        ])
        .collect();

    Some(AiDisplayResult {
        provider,
        score,
        is_ai,
        confidence: Confidence::for_percent(score),
        details,
        segments,
        segment_share,
        origin,
    })
}

/// Normalize a plagiarism envelope
pub fn normalize_plagiarism(
    envelope: &PlagiarismEnvelope,
    origin: ResultOrigin,
) -> Option<PlagiarismDisplayResult> {
    let (provider, result) = select_provider(envelope, &PLAGIARISM_PROVIDER_PREFERENCE)?;

    let sources: Vec<SourceMatches> = result
        .items
        .iter()
        .map(|item| SourceMatches {
            text: item.text.clone(),
            matches: item.candidates.clone(),
        })
        .collect();
    let total_matches = sources.iter().map(|s| s.matches.len()).sum();

    let assessment = if result.plagia_score.value() > PLAGIARISM_FLAG_PERCENT {
        "Potential Plagiarism Detected"
    } else {
        "Mostly Original"
    };

    Some(PlagiarismDisplayResult {
        provider,
        score: result.plagia_score,
        severity: Severity::for_percent(result.plagia_score),
        assessment,
        sources,
        total_matches,
        cost: result.cost,
        origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{AiSegmentItem, PlagiarismItem, PlagiarismLabel, UnitScore};

    fn ai_result(score: f64, labels: &[AiLabel]) -> AiDetectionResult {
        AiDetectionResult {
            ai_score: UnitScore(score),
            items: labels
                .iter()
                .enumerate()
                .map(|(i, &prediction)| AiSegmentItem {
                    text: format!("Sentence {}.", i),
                    prediction,
                    ai_score: UnitScore(0.5),
                    ai_score_detail: None,
                })
                .collect(),
            cost: None,
            status: Some("success".to_string()),
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!is_ai_generated(PercentScore(70.0)));
        assert!(is_ai_generated(PercentScore(70.1)));
        assert!(!is_ai_generated(UnitScore(0.7).to_percent()));
        assert!(is_ai_generated(UnitScore(0.701).to_percent()));
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(Confidence::for_percent(PercentScore(95.0)), Confidence::VeryHigh);
        assert_eq!(Confidence::for_percent(PercentScore(5.0)), Confidence::VeryHigh);
        assert_eq!(Confidence::for_percent(PercentScore(90.0)), Confidence::High);
        assert_eq!(Confidence::for_percent(PercentScore(80.0)), Confidence::High);
        assert_eq!(Confidence::for_percent(PercentScore(10.0)), Confidence::High);
        assert_eq!(Confidence::for_percent(PercentScore(20.0)), Confidence::High);
        assert_eq!(Confidence::for_percent(PercentScore(75.0)), Confidence::Medium);
        assert_eq!(Confidence::for_percent(PercentScore(25.0)), Confidence::Medium);
        assert_eq!(Confidence::for_percent(PercentScore(50.0)), Confidence::Medium);
        assert_eq!(Confidence::VeryHigh.to_string(), "Very High");
    }

    #[test]
    fn test_segment_share() {
        assert_eq!(ai_segment_share(&[]), 0);

        let seg = |is_ai| DisplaySegment {
            text: String::new(),
            is_ai,
            score: PercentScore(0.0),
        };
        assert_eq!(ai_segment_share(&[seg(true), seg(false), seg(false)]), 33);
        assert_eq!(ai_segment_share(&[seg(true), seg(true), seg(false)]), 67);
        assert_eq!(ai_segment_share(&[seg(true)]), 100);
    }

    #[test]
    fn test_prefers_winstonai() {
        let envelope = AiDetectionEnvelope {
            sapling: Some(ai_result(0.1, &[])),
            winstonai: Some(ai_result(0.9, &[])),
        };
        let result = normalize_ai(&envelope, ResultOrigin::Live).unwrap();
        assert_eq!(result.provider, Provider::WinstonAi);
        assert_eq!(result.score, PercentScore(90.0));
    }

    #[test]
    fn test_sapling_only_still_renders() {
        let envelope = AiDetectionEnvelope {
            sapling: Some(ai_result(
                0.42,
                &[AiLabel::AiGenerated, AiLabel::HumanWritten, AiLabel::HumanWritten, AiLabel::HumanWritten],
            )),
            winstonai: None,
        };
        let result = normalize_ai(&envelope, ResultOrigin::Live).unwrap();
        assert_eq!(result.provider, Provider::Sapling);
        assert!(!result.is_ai);
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.segment_share, 25);
        assert_eq!(result.verdict(), "Human-Written");
        assert_eq!(
            result.details,
            vec![
                "Natural language variations typical of human writing",
                "Subtle style shifts throughout content",
                "25% of text segments show AI patterns",
                "Overall AI probability score: 42.0%",
            ]
        );
    }

    #[test]
    fn test_failed_provider_is_skipped() {
        let mut failed = ai_result(0.0, &[]);
        failed.status = Some("fail".to_string());
        let envelope = AiDetectionEnvelope {
            sapling: Some(ai_result(0.8, &[AiLabel::AiGenerated])),
            winstonai: Some(failed),
        };
        let result = normalize_ai(&envelope, ResultOrigin::Live).unwrap();
        assert_eq!(result.provider, Provider::Sapling);
        assert!(result.is_ai);
        assert_eq!(result.details[0], "Statistical patterns consistent with AI generation");
    }

    #[test]
    fn test_empty_envelope_yields_none() {
        assert!(normalize_ai(&AiDetectionEnvelope::default(), ResultOrigin::Live).is_none());
        assert!(normalize_plagiarism(&PlagiarismEnvelope::default(), ResultOrigin::Live).is_none());
    }

    #[test]
    fn test_plagiarism_normalization() {
        let candidate = |score| PlagiarismCandidate {
            url: None,
            plagiarized_text: "copied".to_string(),
            plagia_score: UnitScore(score),
            prediction: PlagiarismLabel::Plagiarized,
        };
        let envelope = PlagiarismEnvelope {
            winstonai: Some(PlagiarismResult {
                plagia_score: PercentScore(45.0),
                items: vec![
                    PlagiarismItem {
                        text: "Source A".to_string(),
                        candidates: vec![candidate(1.0)],
                    },
                    PlagiarismItem {
                        text: "Source B".to_string(),
                        candidates: vec![candidate(0.9), candidate(0.8)],
                    },
                ],
                cost: Some(0.002),
                status: None,
            }),
        };

        let result = normalize_plagiarism(&envelope, ResultOrigin::Live).unwrap();
        assert_eq!(result.total_matches, 3);
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.assessment, "Potential Plagiarism Detected");
        assert_eq!(result.score.format_percentage(), "45%");
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::for_percent(PercentScore(30.0)), Severity::Moderate);
        assert_eq!(Severity::for_percent(PercentScore(10.0)), Severity::Low);
        assert_eq!(Severity::for_percent(PercentScore(10.5)), Severity::Moderate);
        assert_eq!(Severity::for_percent(PercentScore(31.0)), Severity::High);
    }
}
