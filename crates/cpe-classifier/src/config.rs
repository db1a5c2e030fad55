//! Classifier endpoint configuration.
//!
//! The classifier is optional. When `CPE_CLASSIFIER_URL` is unset the
//! engine still runs, but every semantic check fails closed.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default per-classification bound, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for an OpenAI-compatible classifier endpoint.
///
/// Custom `Debug` implementation redacts the `api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClassifierConfig {
    /// Base URL; `/chat/completions` is appended.
    pub endpoint: Url,
    /// Bearer key. Zeroized on drop.
    pub api_key: Zeroizing<String>,
    /// Model name sent with every request.
    pub model: String,
    /// Upper bound on one classification, retries included.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClassifierConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CPE_CLASSIFIER_URL` (unset: no classifier, returns `Ok(None)`)
    /// - `CPE_CLASSIFIER_API_KEY` (required when the URL is set)
    /// - `CPE_CLASSIFIER_MODEL` (default: `gpt-4o-mini`)
    /// - `CPE_CLASSIFIER_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClassifierConfig::from_env`], reading variables through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let raw_url = match get("CPE_CLASSIFIER_URL").filter(|s| !s.trim().is_empty()) {
            Some(u) => u,
            None => return Ok(None),
        };
        let endpoint = Url::parse(raw_url.trim()).map_err(|e| {
            ConfigError::InvalidUrl("CPE_CLASSIFIER_URL".to_string(), e.to_string())
        })?;
        let api_key = get("CPE_CLASSIFIER_API_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let model = get("CPE_CLASSIFIER_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = match get("CPE_CLASSIFIER_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(s) => match s.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidTimeout(s)),
            },
        };

        Ok(Some(Self {
            endpoint,
            api_key: Zeroizing::new(api_key),
            model,
            timeout_secs,
        }))
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl("local mock".to_string(), e.to_string()))?;
        Ok(Self {
            endpoint,
            api_key: Zeroizing::new(api_key.to_string()),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 5,
        })
    }

    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CPE_CLASSIFIER_API_KEY is required when CPE_CLASSIFIER_URL is set")]
    MissingApiKey,
    #[error("API key is not a valid HTTP header value")]
    InvalidApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid CPE_CLASSIFIER_TIMEOUT_SECS {0:?}: expected a positive integer")]
    InvalidTimeout(String),
}
