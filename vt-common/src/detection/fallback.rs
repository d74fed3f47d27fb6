//! Offline fallback simulation
//!
//! Builds a structurally valid detection envelope from the input text alone,
//! without any network call, so the client stays usable when the detection
//! API refuses requests (for example when credits run out). Output is a pure
//! function of the text.

use super::{
    AiDetectionEnvelope, AiDetectionResult, AiLabel, AiSegmentItem, PlagiarismCandidate,
    PlagiarismEnvelope, PlagiarismItem, PlagiarismLabel, PlagiarismResult, UnitScore,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences used for simulated AI segments
pub const AI_MAX_SEGMENTS: usize = 5;

/// Sentences used for simulated plagiarism candidates
pub const PLAGIARISM_MAX_CANDIDATES: usize = 3;

/// Upper bound for simulated segment scores
const MAX_SEGMENT_SCORE: f64 = 0.99;

static SENTENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

/// Length used to derive pseudo-scores (characters, untrimmed)
fn text_length(text: &str) -> usize {
    text.chars().count()
}

/// Hundredths helper keeping the result exact for two-decimal values
fn hundredths(n: usize) -> f64 {
    n as f64 / 100.0
}

/// Split on sentence-terminal punctuation (`.`, `!`, `?`)
///
/// Each sentence keeps its terminal punctuation and is trimmed. A trailing
/// fragment without terminal punctuation is dropped; text with no terminal
/// punctuation at all yields the whole trimmed text.
pub fn split_sentences(text: &str) -> Vec<String> {
    leading_sentences(text, usize::MAX)
}

/// First `limit` sentences, scanning no further than needed
fn leading_sentences(text: &str, limit: usize) -> Vec<String> {
    let sentences: Vec<String> = SENTENCE_PATTERN
        .find_iter(text)
        .take(limit)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    if sentences.is_empty() {
        vec![text.trim().to_string()]
    } else {
        sentences
    }
}

/// 0.5 + (len mod 50)/100, always in [0.50, 0.99]
pub fn ai_pseudo_score(text: &str) -> UnitScore {
    UnitScore(hundredths(50 + text_length(text) % 50))
}

/// 0.2 + (len mod 50)/100, always in [0.20, 0.69]
pub fn plagiarism_pseudo_score(text: &str) -> UnitScore {
    UnitScore(hundredths(20 + text_length(text) % 50))
}

/// Simulated AI-detection envelope (winstonai only)
///
/// Segment `i` is human-written when `i % 3 == 0`, scored `0.3 + i/10`;
/// otherwise ai-generated, scored `0.7 + i/10` capped at 0.99.
pub fn simulate_ai_detection(text: &str) -> AiDetectionEnvelope {
    let items = leading_sentences(text, AI_MAX_SEGMENTS)
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| {
            let (prediction, score) = if i % 3 == 0 {
                (AiLabel::HumanWritten, hundredths(30 + 10 * i))
            } else {
                (AiLabel::AiGenerated, hundredths(70 + 10 * i).min(MAX_SEGMENT_SCORE))
            };
            AiSegmentItem {
                text: sentence,
                prediction,
                ai_score: UnitScore(score),
                ai_score_detail: None,
            }
        })
        .collect();

    AiDetectionEnvelope {
        sapling: None,
        winstonai: Some(AiDetectionResult {
            ai_score: ai_pseudo_score(text),
            items,
            cost: Some(0.0),
            status: Some("success".to_string()),
        }),
    }
}

/// Simulated plagiarism envelope (winstonai only)
///
/// The pseudo-score is stored on the percent scale like a live result.
/// Candidate `i` is scored `0.6 + i/10`; the first has no URL.
pub fn simulate_plagiarism(text: &str) -> PlagiarismEnvelope {
    let items = leading_sentences(text, PLAGIARISM_MAX_CANDIDATES)
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| PlagiarismItem {
            text: format!("Simulated source {}", i + 1),
            candidates: vec![PlagiarismCandidate {
                url: (i > 0).then(|| format!("https://example{}.com/content", i)),
                plagiarized_text: sentence,
                plagia_score: UnitScore(hundredths(60 + 10 * i)),
                prediction: PlagiarismLabel::Plagiarized,
            }],
        })
        .collect();

    PlagiarismEnvelope {
        winstonai: Some(PlagiarismResult {
            plagia_score: plagiarism_pseudo_score(text).to_percent(),
            items,
            cost: Some(0.0),
            status: Some("success".to_string()),
        }),
    }
}
