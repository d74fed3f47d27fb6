//! VeriText demo client (vt-cli) - Main entry point
//!
//! Reads text from an argument, a file, or stdin and prints the AI-detection
//! or plagiarism result. Fallback mode works without a running proxy.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use vt_cli::render::render;
use vt_cli::{analyze, ProxyClient, DEFAULT_PROXY_URL};
use vt_common::detection::normalizer::{DisplayResult, PlagiarismDisplayResult};
use vt_common::detection::{AnalysisRequest, DetectionKind};
use vt_common::report::{render_plagiarism_report, report_filename};
use vt_common::session::{AnalysisSession, DetectionMode};

/// Command-line arguments for vt-cli
#[derive(Parser, Debug)]
#[command(name = "vt-cli")]
#[command(about = "Check text for AI generation or plagiarism via VeriText")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Proxy base URL
    #[arg(long, global = true, env = "VT_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    proxy_url: String,

    /// Use simulated results instead of calling the proxy
    #[arg(long, global = true)]
    fallback: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate whether the text was AI-generated
    Ai {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Check the text for plagiarized passages
    Plagiarism {
        #[command(flatten)]
        input: InputArgs,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Write a plain-text report into this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
}

/// Text source; stdin when neither is given
#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Text to analyze
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// File containing the text to analyze
    #[arg(long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()));
        }

        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (kind, input, title, report_dir) = match args.command {
        Command::Ai { input } => (DetectionKind::AiDetection, input, None, None),
        Command::Plagiarism { input, title, report_dir } => (DetectionKind::Plagiarism, input, title, report_dir),
    };

    let text = input.read()?;
    let mut request = AnalysisRequest::new(text.clone());
    if let Some(title) = &title {
        request = request.with_title(title.clone());
    }

    let backend = ProxyClient::new(args.proxy_url)?;
    let mut session = AnalysisSession::new(backend);
    if args.fallback {
        session.set_mode(DetectionMode::Fallback);
    }
    info!(?kind, mode = ?session.mode(), proxy = session.backend().base_url(), "Submitting");

    let outcome = analyze(&mut session, kind, request).await;
    if let Some(notice) = &outcome.fallback_notice {
        eprintln!("{}", notice);
        eprintln!("Switched to fallback mode; showing simulated results.\n");
    }

    let result = outcome.result?;
    print!("{}", render(&result));

    if let (DisplayResult::Plagiarism(plagiarism), Some(dir)) = (&result, report_dir) {
        let path = write_report(&dir, title.as_deref(), &text, plagiarism)?;
        println!("\nReport saved to {}", path.display());
    }

    Ok(())
}

fn write_report(dir: &Path, title: Option<&str>, text: &str, result: &PlagiarismDisplayResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(report_filename(title));
    let report = render_plagiarism_report(title, text, result, Local::now());
    std::fs::write(&path, report).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
