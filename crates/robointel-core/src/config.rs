//! Provider configuration, read from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// External language-model providers the pipeline can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials and timeouts for outbound provider calls.
///
/// Presence or absence of a credential selects the LLM-backed vs the
/// deterministic path in the parser, and gates the research adapter.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    /// Timeout applied to each outbound provider request.
    pub request_timeout: Duration,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl ProviderConfig {
    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY` and `ANTHROPIC_API_KEY` are optional;
    /// `ROBOINTEL_PROVIDER_TIMEOUT_SECS` defaults to 30.
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("ROBOINTEL_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            openai_api_key: non_empty(std::env::var("OPENAI_API_KEY").ok()),
            anthropic_api_key: non_empty(std::env::var("ANTHROPIC_API_KEY").ok()),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration with no credentials and the default timeout.
    pub fn unconfigured() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// The credential for a specific provider, if configured.
    pub fn credential(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }

    /// The provider the parser should use, preferring OpenAI when both
    /// credentials are present. `None` means the deterministic fallback path.
    pub fn default_provider(&self) -> Option<Provider> {
        if self.openai_api_key.is_some() {
            Some(Provider::OpenAi)
        } else if self.anthropic_api_key.is_some() {
            Some(Provider::Anthropic)
        } else {
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_prefers_openai() {
        let config = ProviderConfig {
            openai_api_key: Some("sk-test".into()),
            anthropic_api_key: Some("ak-test".into()),
            request_timeout: Duration::from_secs(30),
        };
        assert_eq!(config.default_provider(), Some(Provider::OpenAi));
    }

    #[test]
    fn test_default_provider_none_when_unconfigured() {
        let config = ProviderConfig::unconfigured();
        assert_eq!(config.default_provider(), None);
        assert_eq!(config.credential(Provider::OpenAi), None);
        assert_eq!(config.credential(Provider::Anthropic), None);
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(
            serde_json::to_string(&Provider::Anthropic).unwrap(),
            "\"anthropic\""
        );
        let p: Provider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(p, Provider::OpenAi);
    }
}
