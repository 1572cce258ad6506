//! External LLM provider client.
//!
//! Single-shot JSON completions against the OpenAI and Anthropic APIs.
//! Each pipeline invocation makes exactly one call (or two after a retry);
//! the configured timeout bounds how long either may block.

use std::future::Future;

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use robointel_core::{Error, Provider, ProviderConfig, Result};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

const OPENAI_MODEL: &str = "gpt-4o-mini";
const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// HTTP client for outbound provider calls.
pub struct LlmClient {
    client: Client,
    config: ProviderConfig,
}

impl LlmClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// One completion call. Returns the raw text content of the response.
    pub async fn complete(
        &self,
        provider: Provider,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String> {
        let api_key = self.config.credential(provider).ok_or_else(|| {
            Error::Config(match provider {
                Provider::OpenAi => "OPENAI_API_KEY is not configured".to_string(),
                Provider::Anthropic => "ANTHROPIC_API_KEY is not configured".to_string(),
            })
        })?;

        match provider {
            Provider::OpenAi => {
                self.complete_openai(api_key, system, user, max_tokens, temperature)
                    .await
            }
            Provider::Anthropic => {
                self.complete_anthropic(api_key, system, user, max_tokens, temperature)
                    .await
            }
        }
    }

    async fn complete_openai(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String> {
        let body = json!({
            "model": OPENAI_MODEL,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
            "response_format": {"type": "json_object"},
        });

        debug!("Calling OpenAI model {}", OPENAI_MODEL);

        let response = self
            .client
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("openai request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("openai API error {status}: {body}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("openai response read failed: {e}")))?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::Provider("openai response was empty".into()))
    }

    async fn complete_anthropic(
        &self,
        api_key: &str,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String> {
        let body = json!({
            "model": ANTHROPIC_MODEL,
            "system": system,
            "messages": [{"role": "user", "content": user}],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        debug!("Calling Anthropic model {}", ANTHROPIC_MODEL);

        let response = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("anthropic request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "anthropic API error {status}: {body}"
            )));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("anthropic response read failed: {e}")))?;

        parsed["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|b| b["type"].as_str() == Some("text"))
                    .and_then(|b| b["text"].as_str())
            })
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::Provider("anthropic response was empty".into()))
    }
}

/// Run an operation, retrying the identical call exactly once on failure.
///
/// The single reusable combinator behind the parser's and the research
/// adapter's retry policy. The second error is returned unchanged; whether
/// it falls back or surfaces is the caller's decision.
pub async fn retry_once<T, F, Fut>(op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(first) => {
            warn!("provider call failed, retrying once: {}", first);
            op().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retry_once_succeeds_on_second_attempt() {
        let calls = AtomicUsize::new(0);
        let result = retry_once(|| async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Provider("transient".into()))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_once_gives_up_after_two_failures() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_once(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Provider("down".into()))
        })
        .await;
        assert!(matches!(result, Err(Error::Provider(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_complete_without_credential_is_config_error() {
        let client = LlmClient::new(ProviderConfig::unconfigured()).unwrap();
        let err = client
            .complete(Provider::OpenAi, "system", "user", 100, 0.2)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
