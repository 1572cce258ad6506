//! Research agent: prompt construction, provider call, normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::types::*;
use robointel_core::{
    clamp01, EntityMention, EntityType, Error, KeywordMention, Language, ParseResult, Provider,
    ProviderConfig, Result,
};
use robointel_extract::{retry_once, LlmClient};

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap());

const RESEARCH_SYSTEM_PROMPT: &str = "You are a research analyst specializing in the robotics \
industry. Respond only with valid JSON; include no other text.";

/// Asks a provider to research a query and returns structured facts.
pub struct ResearchAgent {
    client: LlmClient,
}

impl ResearchAgent {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: LlmClient::new(config)?,
        })
    }

    /// Run a research query. Unlike the parser there is no deterministic
    /// substitute for external research: a missing credential fails
    /// immediately with a configuration error, and a provider failure
    /// surfaces after one retry.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if self.client.config().credential(request.provider).is_none() {
            return Err(Error::Config(match request.provider {
                Provider::OpenAi => {
                    "OPENAI_API_KEY is not configured; add it to the environment to use this provider"
                        .to_string()
                }
                Provider::Anthropic => {
                    "ANTHROPIC_API_KEY is not configured; add it to the environment to use this provider"
                        .to_string()
                }
            }));
        }

        let prompt = build_prompt(request);
        debug!(
            "research query via {}: {} target types",
            request.provider,
            request.target_types.len()
        );

        retry_once(|| async {
            let raw = self
                .client
                .complete(request.provider, RESEARCH_SYSTEM_PROMPT, &prompt, 3000, 0.3)
                .await?;
            parse_response(&raw)
        })
        .await
    }
}

fn build_prompt(request: &SearchRequest) -> String {
    let target_labels: Vec<&str> = request
        .target_types
        .iter()
        .map(|t| match t {
            EntityType::Company => "companies",
            EntityType::Product => "products (robots)",
            EntityType::Component => "components (SoC, actuators, sensors, etc.)",
            EntityType::Application => "deployment cases and environments",
            EntityType::Keyword => "key technology and market trends",
        })
        .collect();
    let category_names: Vec<&str> = request
        .target_types
        .iter()
        .map(EntityType::as_str)
        .collect();

    format!(
        r#"Research the following query about the robotics industry and return structured facts and metadata only.

Hard rules:
- Never reproduce source article text verbatim.
- Each fact carries a summarized description of one or two sentences.
- Respond only in the JSON format below.

Query: {query}

Target categories: {targets}

Time range: {start} to {end}

Region: {region}

Response JSON format:
{{
  "summary": "overall summary, 2-3 sentences",
  "facts": [
    {{
      "category": "company | product | component | application | keyword",
      "name": "entity name",
      "description": "summarized fact, 1-2 sentences, no verbatim source text",
      "confidence": 0.0
    }}
  ],
  "sources": [
    {{"domain": "source domain (e.g. reuters.com)", "title": "reference title"}}
  ]
}}

Include only facts matching the target categories ({names}).
confidence expresses reliability (0.9+: certain, 0.7-0.9: high, 0.5-0.7: moderate)."#,
        query = request.query,
        targets = target_labels.join(", "),
        start = request.time_range.start,
        end = request.time_range.end,
        region = request.region,
        names = category_names.join(", "),
    )
}

/// Interpret the provider response. Unknown categories collapse to
/// `keyword`, confidence is clamped, facts without a name are dropped.
fn parse_response(raw: &str) -> Result<SearchResponse> {
    let trimmed = raw.trim();
    let json_str = FENCE_RE
        .captures(trimmed)
        .and_then(|cap| cap.get(1))
        .map_or(trimmed, |m| m.as_str());

    let data: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("provider returned malformed JSON: {e}")))?;

    let facts = data
        .get("facts")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let name = entry.get("name").and_then(Value::as_str)?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some(StructuredFact {
                        category: parse_category(
                            entry.get("category").and_then(Value::as_str).unwrap_or(""),
                        ),
                        name: name.to_string(),
                        description: entry
                            .get("description")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        confidence: clamp01(
                            entry
                                .get("confidence")
                                .and_then(Value::as_f64)
                                .unwrap_or(0.5),
                        ),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let sources = data
        .get("sources")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let domain = entry.get("domain").and_then(Value::as_str)?;
                    Some(SourceReference {
                        domain: domain.to_string(),
                        title: entry
                            .get("title")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SearchResponse {
        summary: data
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        facts,
        sources,
    })
}

fn parse_category(value: &str) -> EntityType {
    match value {
        "company" => EntityType::Company,
        "product" => EntityType::Product,
        "component" => EntityType::Component,
        "application" => EntityType::Application,
        _ => EntityType::Keyword,
    }
}

/// Bucket research facts into the parser's `ParseResult` shape so the
/// linker treats both entry points identically. Keyword facts become
/// `{term, relevance}` pairs; the language is inferred from the summary.
pub fn to_parse_result(response: &SearchResponse) -> ParseResult {
    let mention = |fact: &StructuredFact| EntityMention {
        name: fact.name.clone(),
        entity_type: fact.category,
        confidence: fact.confidence,
        context: fact.description.clone(),
    };
    let bucket = |category: EntityType| -> Vec<EntityMention> {
        response
            .facts
            .iter()
            .filter(|f| f.category == category)
            .map(mention)
            .collect()
    };

    ParseResult {
        companies: bucket(EntityType::Company),
        products: bucket(EntityType::Product),
        components: bucket(EntityType::Component),
        applications: bucket(EntityType::Application),
        keywords: response
            .facts
            .iter()
            .filter(|f| f.category == EntityType::Keyword)
            .map(|f| KeywordMention {
                term: f.name.clone(),
                relevance: f.confidence,
            })
            .collect(),
        summary: response.summary.clone(),
        detected_language: Language::detect(&response.summary),
    }
}
