//! AI provider configuration loaded from the environment.

use std::time::Duration;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default Anthropic API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Settings for the AI gateway.
#[derive(Clone)]
pub struct AiConfig {
    /// Provider credential. `None` leaves the gateway disabled.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Upper bound on a single provider call (default: `45`s).
    pub timeout: Duration,
}

impl AiConfig {
    /// Load AI settings from environment variables.
    ///
    /// | Env Var             | Default                        |
    /// |---------------------|--------------------------------|
    /// | `ANTHROPIC_API_KEY` | unset (gateway disabled)       |
    /// | `AI_MODEL`          | `claude-3-5-sonnet-20241022`   |
    /// | `AI_BASE_URL`       | `https://api.anthropic.com/v1` |
    /// | `AI_TIMEOUT_SECS`   | `45`                           |
    pub fn from_env() -> Self {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let base_url = std::env::var("AI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("AI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "45".into())
            .parse()
            .expect("AI_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration with no credential, for tests and local runs.
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(45),
        }
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let config = AiConfig {
            api_key: Some("sk-ant-secret".to_string()),
            ..AiConfig::disabled()
        };
        let out = format!("{config:?}");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("sk-ant-secret"));
    }
}
