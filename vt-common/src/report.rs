//! Plain-text plagiarism report export

use crate::detection::normalizer::{PlagiarismDisplayResult, ResultOrigin};
use crate::detection::DEFAULT_DOCUMENT_TITLE;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Trimmed title, None when absent or blank
///
/// Both the file name and the report body go through this, so a
/// whitespace-only title counts as no title in either place.
fn report_title(title: Option<&str>) -> Option<&str> {
    title.map(str::trim).filter(|t| !t.is_empty())
}

/// Report file name: each interior whitespace run in the trimmed title becomes `_`
///
/// Leading and trailing whitespace is dropped, so the name never starts or
/// ends with `_`.
pub fn report_filename(title: Option<&str>) -> String {
    let slug = report_title(title).map_or_else(
        || "Untitled".to_string(),
        |t| t.split_whitespace().collect::<Vec<_>>().join("_"),
    );
    format!("VeriText_Plagiarism_Report_{}.txt", slug)
}

/// Render the full report for one plagiarism result
pub fn render_plagiarism_report(
    title: Option<&str>,
    text: &str,
    result: &PlagiarismDisplayResult,
    generated_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    // fmt::Write for String never fails
    let _ = write_report(&mut out, title, text, result, generated_at);
    out
}

fn write_report(
    out: &mut String,
    title: Option<&str>,
    text: &str,
    result: &PlagiarismDisplayResult,
    generated_at: DateTime<Local>,
) -> std::fmt::Result {
    let title = report_title(title).unwrap_or(DEFAULT_DOCUMENT_TITLE);

    writeln!(out, "VeriText Plagiarism Report")?;
    writeln!(out, "========================\n")?;
    writeln!(out, "Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Document: {}", title)?;
    if result.origin == ResultOrigin::Simulated {
        writeln!(out, "Mode: fallback (simulated results, not from the detection API)")?;
    }
    out.push('\n');

    writeln!(out, "SUMMARY")?;
    writeln!(out, "=======")?;
    writeln!(out, "Plagiarism Score: {}", result.score.format_percentage())?;
    writeln!(out, "Overall Assessment: {}", result.assessment)?;
    writeln!(out, "Sources Found: {}", result.sources.len())?;
    writeln!(out, "Total Matches: {}\n", result.total_matches)?;

    writeln!(out, "DETAILED ANALYSIS")?;
    writeln!(out, "=================\n")?;

    for (index, source) in result.sources.iter().enumerate() {
        writeln!(out, "Source {}: {}", index + 1, source.text)?;
        writeln!(out, "{}", "-".repeat(40))?;

        for (m_index, candidate) in source.matches.iter().enumerate() {
            writeln!(
                out,
                "Match {} (Confidence: {})",
                m_index + 1,
                candidate.plagia_score.format_percentage()
            )?;
            writeln!(out, "Text: \"{}\"", candidate.plagiarized_text)?;
            if let Some(url) = &candidate.url {
                writeln!(out, "Source URL: {}", url)?;
            }
            out.push('\n');
        }
        out.push('\n');
    }

    writeln!(out, "ANALYZED TEXT")?;
    writeln!(out, "=============\n")?;
    out.push_str(text);
    Ok(())
}
