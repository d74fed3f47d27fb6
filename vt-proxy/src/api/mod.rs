//! HTTP API handlers for vt-proxy

pub mod detect;
pub mod health;

pub use detect::{detect_ai, detect_plagiarism, detect_routes};
pub use health::health_routes;
