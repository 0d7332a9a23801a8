//! Console configuration parsed from environment variables.
//!
//! CLI flags override these values in `main.rs`; library users can build a
//! [`ConsoleConfig`] directly.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_STATE_DIR_NAME: &str = ".hotpush";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOAST_SECS: u64 = 3;

/// Errors produced while validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),

    #[error("invalid API prefix '{0}': must start with '/'")]
    InvalidApiPrefix(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Scheme + host of the backend, without trailing slash.
    pub base_url: String,
    /// Fixed path prefix every API endpoint is appended to.
    pub api_prefix: String,
    /// Directory holding `storage.json`.
    pub state_dir: PathBuf,
    pub timeouts: Timeouts,
    /// How long a toast stays visible.
    pub toast_duration: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            state_dir: default_state_dir(std::env::var("HOME").ok().as_deref()),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            toast_duration: Duration::from_secs(DEFAULT_TOAST_SECS),
        }
    }
}

impl ConsoleConfig {
    /// Build typed console config from environment variables.
    ///
    /// Optional:
    /// - `HOTPUSH_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `HOTPUSH_API_PREFIX`: default `/api`
    /// - `HOTPUSH_STATE_DIR`: default `$HOME/.hotpush`
    /// - `HOTPUSH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `HOTPUSH_CONNECT_TIMEOUT_SECS`: default 10
    /// - `HOTPUSH_TOAST_SECS`: default 3
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL or API prefix is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url = std::env::var("HOTPUSH_BASE_URL").unwrap_or(defaults.base_url);
        let api_prefix = std::env::var("HOTPUSH_API_PREFIX").unwrap_or(defaults.api_prefix);
        let state_dir = std::env::var("HOTPUSH_STATE_DIR").map_or(defaults.state_dir, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("HOTPUSH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("HOTPUSH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let toast_duration = Duration::from_secs(env_parse_u64("HOTPUSH_TOAST_SECS", DEFAULT_TOAST_SECS));

        Self { base_url, api_prefix, state_dir, timeouts, toast_duration }.validated()
    }

    /// Normalize trailing slashes and check URL shape.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL or API prefix is malformed.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(&self.base_url)?;
        self.api_prefix = normalize_api_prefix(&self.api_prefix)?;
        Ok(self)
    }

    /// Absolute API base, e.g. `http://127.0.0.1:8000/api`.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}{}", self.base_url, self.api_prefix)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn normalize_api_prefix(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        // Endpoints mounted at the root.
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidApiPrefix(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn default_state_dir(home: Option<&str>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(DEFAULT_STATE_DIR_NAME),
        _ => PathBuf::from(DEFAULT_STATE_DIR_NAME),
    }
}
