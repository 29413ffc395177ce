use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_CRASH_RECHECK_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    pub health_interval: Duration,
    pub crash_recheck_delay: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Validates `base_url` as an absolute http(s) URL; a trailing slash is dropped.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let raw = base_url.as_ref().trim();
        let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: raw.trim_end_matches('/').to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
            crash_recheck_delay: DEFAULT_CRASH_RECHECK_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval;
        self
    }

    pub fn with_crash_recheck_delay(mut self, delay: Duration) -> Self {
        self.crash_recheck_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
            crash_recheck_delay: DEFAULT_CRASH_RECHECK_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
