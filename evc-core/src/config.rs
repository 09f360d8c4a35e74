use crate::error::ApiError;
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "API_URL";

/// Optional environment variable overriding the request timeout (seconds).
pub const API_TIMEOUT_VAR: &str = "API_TIMEOUT_SECS";

/// Applied to every request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Validate and normalise a base URL (trailing slashes are dropped).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ApiError::InvalidConfig(format!("{} is empty", API_URL_VAR)));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "{} must start with http:// or https://, got {}",
                API_URL_VAR, trimmed
            )));
        }
        Ok(ApiConfig {
            base_url: trimmed.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from any key → value source.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ApiError> {
        let base_url = lookup(API_URL_VAR)
            .ok_or_else(|| ApiError::InvalidConfig(format!("{} is not set", API_URL_VAR)))?;
        let config = ApiConfig::new(&base_url)?;
        match lookup(API_TIMEOUT_VAR) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ApiError::InvalidConfig(format!("{} must be whole seconds, got {}", API_TIMEOUT_VAR, raw))
                })?;
                Ok(config.with_timeout(Duration::from_secs(secs)))
            }
            None => Ok(config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of `path` under the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
