//! LLM-backed article parsing with a deterministic fallback.
//!
//! One structured prompt extracts companies, products, components,
//! applications, keywords and a summary in a single provider call. The call
//! is retried once; a second failure (or a missing credential) routes to
//! the dictionary-based fallback, which never fails for valid input.
//!
//! Article text is sent to the provider and dropped; it is never logged or
//! retained beyond the current call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::dictionary;
use crate::provider::{retry_once, LlmClient};
use robointel_core::{
    clamp01, EntityMention, EntityType, Error, KeywordMention, Language, ParseOptions,
    ParseResult, ProviderConfig, Result,
};

/// Inputs shorter than this are rejected before any provider call.
const MIN_TEXT_CHARS: usize = 20;
/// Article text is truncated to this many characters in the prompt.
const MAX_PROMPT_CHARS: usize = 4000;
const FALLBACK_KEYWORD_CAP: usize = 10;
const FALLBACK_SUMMARY_CHAR_CAP: usize = 300;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap());
static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?。]\s*").unwrap());

/// Parses raw article text into typed mentions, keywords and a summary.
pub struct ArticleParser {
    client: LlmClient,
}

impl ArticleParser {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }

    /// Parse an article. `language` overrides detection when supplied.
    ///
    /// Fails only on the minimum-length precondition; provider failures
    /// retry once and then fall back to the deterministic path.
    pub async fn parse(
        &self,
        text: &str,
        language: Option<Language>,
        options: ParseOptions,
    ) -> Result<ParseResult> {
        if text.trim().chars().count() < MIN_TEXT_CHARS {
            return Err(Error::InvalidInput(format!(
                "text is too short; at least {} characters are required",
                MIN_TEXT_CHARS
            )));
        }

        let detected = language.unwrap_or_else(|| Language::detect(text));

        let provider = match self.client.config().default_provider() {
            Some(p) => p,
            None => {
                info!("no provider credential configured, using deterministic fallback");
                return Ok(fallback_parse(text, detected, &options));
            }
        };

        let system = system_prompt(detected);
        let user = user_prompt(text, detected, &options);

        let outcome = retry_once(|| async {
            let raw = self
                .client
                .complete(provider, &system, &user, 2000, 0.2)
                .await?;
            parse_response(&raw, detected)
        })
        .await;

        match outcome {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("provider parse failed after retry, using deterministic fallback: {}", e);
                Ok(fallback_parse(text, detected, &options))
            }
        }
    }
}

fn system_prompt(language: Language) -> String {
    let summary_language = match language {
        Language::Ko => "Korean",
        Language::En => "English",
    };
    format!(
        r#"You are an expert robotics industry analyst. Extract structured entities from articles about humanoid robots, robotics components, and related industries.

Always respond in valid JSON with the following structure:
{{
  "companies": [{{"name": "...", "confidence": 0.0, "context": "..."}}],
  "products": [{{"name": "...", "confidence": 0.0, "context": "..."}}],
  "components": [{{"name": "...", "confidence": 0.0, "context": "..."}}],
  "applications": [{{"name": "...", "confidence": 0.0, "context": "..."}}],
  "keywords": [{{"term": "...", "relevance": 0.0}}],
  "summary": "..."
}}

Rules:
- confidence: 0.9+ for explicitly mentioned, 0.7-0.9 for strongly implied, 0.5-0.7 for loosely related
- context: short excerpt from the original text where the entity was found
- keywords: industry-relevant terms (technology, market, application concepts)
- summary: 2-3 sentence summary in {summary_language}
- Focus on humanoid robots, robotics, AI, automation, SoC, actuators, sensors"#
    )
}

fn user_prompt(text: &str, language: Language, options: &ParseOptions) -> String {
    let mut sections = Vec::new();
    if options.companies {
        sections.push("companies");
    }
    if options.products {
        sections.push("products (robots)");
    }
    if options.components {
        sections.push("components (SoC, actuators, sensors, etc.)");
    }
    if options.applications {
        sections.push("applications (deployment cases and environments)");
    }
    if options.keywords {
        sections.push("keywords");
    }
    if options.summary {
        sections.push("summary");
    }

    let article_language = match language {
        Language::Ko => "Korean",
        Language::En => "English",
    };
    let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    let section_list = sections
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following {article_language} article and extract:\n{section_list}\n\n\
         For disabled sections, return empty arrays or an empty string.\n\n\
         Article text:\n---\n{truncated}\n---"
    )
}

/// Interpret a provider response, tolerating a fenced code block around the
/// JSON. Scores are clamped to [0, 1], missing fields are defaulted, and
/// entities without a name are dropped.
fn parse_response(raw: &str, detected_language: Language) -> Result<ParseResult> {
    let trimmed = raw.trim();
    let json_str = FENCE_RE
        .captures(trimmed)
        .and_then(|cap| cap.get(1))
        .map_or(trimmed, |m| m.as_str());

    let data: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("provider returned malformed JSON: {e}")))?;

    Ok(ParseResult {
        companies: map_entities(data.get("companies"), EntityType::Company),
        products: map_entities(data.get("products"), EntityType::Product),
        components: map_entities(data.get("components"), EntityType::Component),
        applications: map_entities(data.get("applications"), EntityType::Application),
        keywords: map_keywords(data.get("keywords")),
        summary: data
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        detected_language,
    })
}

fn map_entities(value: Option<&Value>, entity_type: EntityType) -> Vec<EntityMention> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let name = entry.get("name").and_then(Value::as_str)?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some(EntityMention {
                        name: name.to_string(),
                        entity_type,
                        confidence: clamp01(
                            entry
                                .get("confidence")
                                .and_then(Value::as_f64)
                                .unwrap_or(0.5),
                        ),
                        context: entry
                            .get("context")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn map_keywords(value: Option<&Value>) -> Vec<KeywordMention> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let term = entry.get("term").and_then(Value::as_str)?.trim();
                    if term.is_empty() {
                        return None;
                    }
                    Some(KeywordMention {
                        term: term.to_string(),
                        relevance: clamp01(
                            entry
                                .get("relevance")
                                .and_then(Value::as_f64)
                                .unwrap_or(0.5),
                        ),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Deterministic path: dictionary keywords plus a leading-sentence summary.
/// Typed entity arrays stay empty; only the LLM produces those.
fn fallback_parse(text: &str, language: Language, options: &ParseOptions) -> ParseResult {
    let mut result = ParseResult::empty(language);

    if options.keywords {
        result.keywords = dictionary::extract_multilingual(text)
            .into_iter()
            .take(FALLBACK_KEYWORD_CAP)
            .map(|kw| KeywordMention {
                term: kw.term,
                relevance: kw.relevance,
            })
            .collect();
    }

    if options.summary {
        let sentences: Vec<&str> = SENTENCE_END_RE
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .take(2)
            .collect();
        result.summary = sentences
            .join(". ")
            .chars()
            .take(FALLBACK_SUMMARY_CHAR_CAP)
            .collect();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_parser() -> ArticleParser {
        ArticleParser::new(ProviderConfig::unconfigured()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_short_text() {
        let parser = offline_parser();
        let err = parser
            .parse("too short", None, ParseOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_fallback_never_throws_for_valid_input() {
        let parser = offline_parser();
        // 25 characters, no credential configured.
        let result = parser
            .parse("Tesla ships new actuators", None, ParseOptions::default())
            .await
            .unwrap();
        assert!(result.companies.is_empty());
        assert!(result.products.is_empty());
        assert!(result.components.is_empty());
        assert!(result.applications.is_empty());
        assert!(!result.keywords.is_empty());
        assert_eq!(result.detected_language, Language::En);
        for kw in &result.keywords {
            assert!(kw.relevance >= 0.0 && kw.relevance <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_fallback_detects_korean() {
        let parser = offline_parser();
        let result = parser
            .parse(
                "현대로보틱스가 새로운 휴머노이드 로봇을 공개했다. 물류 현장에 투입된다.",
                None,
                ParseOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.detected_language, Language::Ko);
        assert!(result.keywords.iter().any(|k| k.term == "휴머노이드"));
        assert!(!result.summary.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_respects_disabled_sections() {
        let parser = offline_parser();
        let options = ParseOptions {
            keywords: false,
            summary: false,
            ..ParseOptions::default()
        };
        let result = parser
            .parse("Tesla ships new actuators for the Optimus robot line", None, options)
            .await
            .unwrap();
        assert!(result.keywords.is_empty());
        assert!(result.summary.is_empty());
    }

    #[test]
    fn test_parse_response_clamps_and_defaults() {
        let raw = r#"{
            "companies": [
                {"name": "RobotCo", "confidence": 1.7, "context": "RobotCo said"},
                {"name": "ActuCorp"},
                {"name": "", "confidence": 0.9}
            ],
            "keywords": [{"term": "actuator", "relevance": -0.3}],
            "summary": "Two firms."
        }"#;
        let result = parse_response(raw, Language::En).unwrap();
        assert_eq!(result.companies.len(), 2);
        assert_eq!(result.companies[0].confidence, 1.0);
        assert_eq!(result.companies[1].confidence, 0.5);
        assert_eq!(result.companies[1].context, "");
        assert_eq!(result.keywords[0].relevance, 0.0);
        assert_eq!(result.summary, "Two firms.");
        assert!(result.products.is_empty());
    }

    #[test]
    fn test_parse_response_tolerates_fenced_json() {
        let raw = "```json\n{\"companies\": [{\"name\": \"RobotCo\", \"confidence\": 0.9, \"context\": \"\"}], \"summary\": \"ok\"}\n```";
        let result = parse_response(raw, Language::En).unwrap();
        assert_eq!(result.companies.len(), 1);
        assert_eq!(result.companies[0].name, "RobotCo");
    }

    #[test]
    fn test_parse_response_malformed_is_parse_error() {
        let err = parse_response("not json at all", Language::En).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_user_prompt_lists_only_enabled_sections() {
        let options = ParseOptions {
            companies: true,
            products: false,
            components: false,
            applications: false,
            keywords: true,
            summary: false,
        };
        let prompt = user_prompt("Some article text", Language::En, &options);
        assert!(prompt.contains("- companies"));
        assert!(prompt.contains("- keywords"));
        assert!(!prompt.contains("products"));
        assert!(!prompt.contains("summary"));
    }

    #[test]
    fn test_user_prompt_truncates_long_text() {
        let text = "a".repeat(10_000);
        let prompt = user_prompt(&text, Language::En, &ParseOptions::default());
        assert!(prompt.chars().count() < MAX_PROMPT_CHARS + 500);
    }
}
