//! Client configuration.

use crate::constants::*;
use crate::error::{Error, Result};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Connection settings shared by every request a client makes.
///
/// The base URL is checked when it is set, so a `ClientConfig` always points
/// at an HTTPS endpoint. Once handed to a client the configuration is never
/// mutated.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    api_secret: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Configuration for the public API with the default timeout.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            timeout: default_timeout(),
        }
    }

    /// Point the configuration at another deployment. Fails unless the URL
    /// uses the `https` scheme.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.base_url = validate_base_url(base_url.as_ref())?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `A1BASE_API_KEY`, `A1BASE_API_SECRET` and the optional
    /// `A1BASE_BASE_URL` / `A1BASE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{key} is not set")))
        };
        let mut config = Self::new(required(ENV_API_KEY)?, required(ENV_API_SECRET)?);

        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url.trim())?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Credentials stay out of debug output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("invalid base URL {trimmed:?}: {e}")))?;
    if url.scheme() != "https" {
        return Err(Error::InsecureBaseUrl(trimmed.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
