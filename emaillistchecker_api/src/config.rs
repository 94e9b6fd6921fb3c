//! Client configuration: credentials, endpoint and timeout.

use std::time::Duration;

use url::Url;

use crate::Error;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://platform.emaillistchecker.io/api/v1";

/// Timeout applied to every request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "EMAILLISTCHECKER_API_KEY";
pub const ENV_BASE_URL: &str = "EMAILLISTCHECKER_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "EMAILLISTCHECKER_TIMEOUT_SECS";

/// Settings a [`Client`](crate::Client) is built from. Fixed once the client exists.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for the production API with the default timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `EMAILLISTCHECKER_API_KEY`, `EMAILLISTCHECKER_BASE_URL` and
    /// `EMAILLISTCHECKER_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|url| !url.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Base URL with trailing slashes removed, checked to be an absolute URL.
    pub(crate) fn normalized_base_url(&self) -> Result<String, Error> {
        let trimmed = self.base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| {
            tracing::error!("Invalid base URL {:?}: {}", self.base_url, e);
            Error::InvalidBaseUrl(format!("{}: {}", self.base_url, e))
        })?;
        Ok(trimmed.to_string())
    }
}
