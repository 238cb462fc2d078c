//! Client configuration
//!
//! Loaded from environment variables with sensible defaults.

use std::time::Duration;

use url::Url;

use crate::document::DEFAULT_MAX_UPLOAD_BYTES;
use crate::error::{MatcherError, Result};

/// Default matching service base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL with a trailing slash; endpoint paths are relative to it (MATCHER_API_URL)
    pub base_url: String,
    /// Request timeout (MATCHER_TIMEOUT_SECS, default: none)
    pub timeout: Option<Duration>,
    /// Largest document accepted locally (MATCHER_MAX_UPLOAD_MB, default: 50)
    pub max_upload_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("{DEFAULT_API_URL}/"),
            timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = match std::env::var("MATCHER_API_URL") {
            Ok(raw) if !raw.trim().is_empty() => parse_base_url(raw.trim())?.to_string(),
            _ => format!("{DEFAULT_API_URL}/"),
        };

        let timeout = std::env::var("MATCHER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let max_upload_bytes = match std::env::var("MATCHER_MAX_UPLOAD_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|mb| *mb > 0)
        {
            Some(mb) => upload_limit_bytes(mb)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            base_url,
            timeout,
            max_upload_bytes,
        })
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        self.base_url = parse_base_url(raw)?.to_string();
        Ok(self)
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        parse_base_url(&self.base_url)?
            .join(path.trim_start_matches('/'))
            .map_err(|e| MatcherError::Config(format!("Invalid endpoint path '{path}': {e}")))
    }
}

/// Convert an upload limit in megabytes to bytes.
pub fn upload_limit_bytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024).ok_or_else(|| {
        MatcherError::Config(format!("MATCHER_MAX_UPLOAD_MB={mb} is too large"))
    })
}

/// Parse a base URL, forcing a trailing slash so joins keep its path.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|e| MatcherError::Config(format!("Invalid API URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(MatcherError::Config(format!(
            "Unsupported API URL scheme '{other}' (expected http or https)"
        ))),
    }
}
