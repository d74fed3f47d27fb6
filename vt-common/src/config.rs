//! Configuration loading and API credential resolution
//!
//! Bootstrap settings follow this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and compiled
//! defaults are used. A TOML file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_ENV_VAR: &str = "VERITEXT_CONFIG";

/// Environment variable holding the Eden AI bearer credential
pub const API_KEY_ENV_VAR: &str = "EDEN_AI_API_KEY";

/// Default Eden AI API base URL
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.edenai.run";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Interface the proxy binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Outbound detection API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Outbound detection API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL; endpoint paths are appended to it
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    /// Bearer credential. `EDEN_AI_API_KEY` takes precedence when set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Outbound request timeout. None leaves the transport default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_upstream_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve the TOML config file location
///
/// Priority: CLI argument → `VERITEXT_CONFIG` → `<config_dir>/veritext/<module>.toml`.
/// Returns None only when no platform config directory exists.
pub fn resolve_config_path(cli_arg: Option<&Path>, module_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("veritext").join(format!("{}.toml", module_name)))
}

/// Load bootstrap configuration from a TOML file
///
/// Missing file → warning + compiled defaults.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    info!("Loaded TOML configuration from {}", path.display());
    Ok(config)
}

/// Resolve the bearer credential for one outbound request
///
/// **Priority:** ENV → TOML. Re-evaluated on every call so a rotated
/// credential is picked up without a restart.
pub fn resolve_api_key(upstream: &UpstreamConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    if let Some(key) = env_key {
        if is_valid_key(&key) {
            return Some(key);
        }
    }

    upstream
        .api_key
        .as_ref()
        .filter(|key| is_valid_key(key))
        .cloned()
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
