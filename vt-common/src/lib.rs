//! # VeriText Common Library
//!
//! Shared code for the VeriText proxy and demo client including:
//! - Detection request/response types (Eden AI envelopes)
//! - Result normalization into display results
//! - Offline fallback simulation
//! - Client submission session state machine
//! - Configuration loading
//! - Plagiarism report rendering

pub mod config;
pub mod detection;
pub mod error;
pub mod report;
pub mod session;

pub use detection::{AnalysisRequest, PercentScore, Provider, UnitScore};
pub use error::{Error, Result};
