//! Terminal rendering of display results

use std::fmt::{self, Write};
use vt_common::detection::normalizer::{AiDisplayResult, DisplayResult, PlagiarismDisplayResult, ResultOrigin};

pub const SIMULATED_NOTICE: &str = "Note: simulated result (fallback mode), not produced by the detection API.";

pub fn render(result: &DisplayResult) -> String {
    match result {
        DisplayResult::Ai(ai) => render_ai(ai),
        DisplayResult::Plagiarism(plagiarism) => render_plagiarism(plagiarism),
    }
}

pub fn render_ai(result: &AiDisplayResult) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails
    let _ = write_ai(&mut out, result);
    out
}

pub fn render_plagiarism(result: &PlagiarismDisplayResult) -> String {
    let mut out = String::new();
    let _ = write_plagiarism(&mut out, result);
    out
}

fn write_origin(out: &mut String, origin: ResultOrigin) -> fmt::Result {
    if origin == ResultOrigin::Simulated {
        writeln!(out, "{}", SIMULATED_NOTICE)?;
    }
    Ok(())
}

fn write_ai(out: &mut String, result: &AiDisplayResult) -> fmt::Result {
    writeln!(out, "AI Detection ({})", result.provider)?;
    write_origin(out, result.origin)?;
    writeln!(out, "Verdict: {} ({})", result.verdict(), result.score.format_percentage())?;
    writeln!(out, "Confidence: {}", result.confidence)?;

    writeln!(out, "\nDetails:")?;
    for line in &result.details {
        writeln!(out, "  - {}", line)?;
    }

    if !result.segments.is_empty() {
        writeln!(out, "\nSegments ({}% AI):", result.segment_share)?;
        for segment in &result.segments {
            let tag = if segment.is_ai { "AI" } else { "Human" };
            writeln!(out, "  [{} {}] {}", tag, segment.score.format_percentage(), segment.text)?;
        }
    }
    Ok(())
}

fn write_plagiarism(out: &mut String, result: &PlagiarismDisplayResult) -> fmt::Result {
    writeln!(out, "Plagiarism Check ({})", result.provider)?;
    write_origin(out, result.origin)?;
    writeln!(out, "Score: {}", result.score.format_percentage())?;
    writeln!(out, "Assessment: {}", result.assessment)?;
    writeln!(
        out,
        "Sources: {}, matches: {}",
        result.sources.len(),
        result.total_matches
    )?;

    for (index, source) in result.sources.iter().enumerate() {
        writeln!(out, "\n{}. {}", index + 1, source.text)?;
        for candidate in &source.matches {
            writeln!(
                out,
                "   {} match: \"{}\"",
                candidate.plagia_score.format_percentage(),
                candidate.plagiarized_text
            )?;
            if let Some(url) = &candidate.url {
                writeln!(out, "   {}", url)?;
            }
        }
    }

    if let Some(cost) = result.cost {
        writeln!(out, "\nCost: {}", cost)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_common::detection::fallback::{simulate_ai_detection, simulate_plagiarism};
    use vt_common::detection::normalizer::{normalize_ai, normalize_plagiarism};
    use vt_common::detection::{AiDetectionEnvelope, AiDetectionResult, UnitScore};

    const TEXT: &str = "First sentence here. Second one follows! Is this the third?";

    #[test]
    fn test_live_ai_result_has_no_simulated_notice() {
        let envelope = AiDetectionEnvelope {
            sapling: Some(AiDetectionResult {
                ai_score: UnitScore(0.95),
                ..AiDetectionResult::default()
            }),
            winstonai: None,
        };
        let result = normalize_ai(&envelope, ResultOrigin::Live).unwrap();

        let out = render_ai(&result);
        assert!(out.starts_with("AI Detection (sapling)\n"));
        assert!(out.contains("Verdict: AI-Generated (95%)"));
        assert!(out.contains("Confidence: Very High"));
        assert!(!out.contains(SIMULATED_NOTICE));
    }

    #[test]
    fn test_simulated_ai_result_is_labeled() {
        let result = normalize_ai(&simulate_ai_detection(TEXT), ResultOrigin::Simulated).unwrap();

        let out = render(&DisplayResult::Ai(result));
        assert!(out.contains(SIMULATED_NOTICE));
        assert!(out.contains("[Human 30%] First sentence here."));
        assert!(out.contains("[AI 80%] Second one follows!"));
    }

    #[test]
    fn test_plagiarism_lists_sources_and_urls() {
        let result = normalize_plagiarism(&simulate_plagiarism(TEXT), ResultOrigin::Simulated).unwrap();

        let out = render_plagiarism(&result);
        assert!(out.contains(SIMULATED_NOTICE));
        assert!(out.contains("Sources: 3, matches: 3"));
        assert!(out.contains("1. Simulated source 1"));
        assert!(out.contains("https://example2.com/content"));
        assert!(out.contains("Cost: 0"));
    }
}
