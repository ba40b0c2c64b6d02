//! Run configuration.
//!
//! A `HeraldConfig` is built once at startup and handed to the components
//! that need it. Only the two credentials come from the environment here;
//! everything else is a default or an explicit override.

use std::time::Duration;

use herald_http::{GeminiConfig, GitHubConfig};

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_API_TOKEN";
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

pub const DEFAULT_REPOSITORY: &str = "team-mirai/policy";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_GEMINI_API: &str = "https://generativelanguage.googleapis.com";

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("repository must be non-empty and look like owner/name, got {0:?}")]
    InvalidRepository(String),

    #[error("max review attempts must be at least 1")]
    ZeroAttempts,

    #[error("summarizer concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeraldConfig {
    /// `owner/name` of the monitored repository
    pub repository: String,
    pub github_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub model: String,
    /// Sampling temperature for every model call; the service default when unset
    pub temperature: Option<f64>,
    pub github_api_base: String,
    pub gemini_api_base: String,
    /// Applied to every outbound HTTP request
    pub request_timeout: Duration,
    /// Compose attempts before giving up on NeedsReview verdicts
    pub max_attempts: u32,
    /// Summarizer calls in flight at once
    pub concurrency: usize,
    /// Feed rejection reasons into the next compose prompt
    pub feedback: bool,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            github_token: None,
            gemini_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            github_api_base: DEFAULT_GITHUB_API.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API.to_string(),
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            concurrency: 4,
            feedback: false,
        }
    }
}

impl HeraldConfig {
    /// Defaults plus the two credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults plus credentials from `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            github_token: non_blank(GITHUB_TOKEN_VAR),
            gemini_api_key: non_blank(GEMINI_KEY_VAR),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_repo = self
            .repository
            .split_once('/')
            .is_some_and(|(owner, name)| {
                !owner.is_empty() && !name.is_empty() && !name.contains('/')
            });
        if !valid_repo {
            return Err(ConfigError::InvalidRepository(self.repository.clone()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::InvalidTemperature(t));
            }
        }
        Ok(())
    }

    /// Credential variables that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.github_token.is_none() {
            missing.push(GITHUB_TOKEN_VAR);
        }
        if self.gemini_api_key.is_none() {
            missing.push(GEMINI_KEY_VAR);
        }
        missing
    }

    pub fn github_config(&self) -> GitHubConfig {
        let mut config = GitHubConfig::new(&self.github_api_base).with_timeout(self.request_timeout);
        if let Some(token) = &self.github_token {
            config = config.with_token(token);
        }
        config
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        let mut config = GeminiConfig::new(&self.gemini_api_base)
            .with_model(&self.model)
            .with_timeout(self.request_timeout);
        if let Some(key) = &self.gemini_api_key {
            config = config.with_api_key(key);
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        config
    }
}
