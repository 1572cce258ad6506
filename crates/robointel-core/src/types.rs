//! Shared domain types exchanged between pipeline stages.

use serde::{Deserialize, Serialize};

/// The closed set of entity types the pipeline understands.
///
/// Companies, products and components have canonical tables in the store;
/// keywords are canonical but carry relevance instead of link confidence;
/// applications are extracted and linked against nothing (always unmatched).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Company,
    Product,
    Component,
    Application,
    Keyword,
}

impl EntityType {
    /// Whether alternate names are maintained for this entity type.
    /// Only companies and products (robots) carry alias rows.
    pub fn supports_aliases(&self) -> bool {
        matches!(self, Self::Company | Self::Product)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Product => "product",
            Self::Component => "component",
            Self::Application => "application",
            Self::Keyword => "keyword",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Languages the pipeline distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
        }
    }

    /// Cheap script-based language detection, not true language ID.
    ///
    /// Counts characters in the Hangul syllables block against all
    /// non-whitespace characters; above a 20% proportion the text is
    /// classified as Korean, otherwise English.
    pub fn detect(text: &str) -> Self {
        let hangul = text
            .chars()
            .filter(|c| ('\u{AC00}'..='\u{D7AF}').contains(c))
            .count();
        let total = text.chars().filter(|c| !c.is_whitespace()).count().max(1);
        if hangul as f64 / total as f64 > 0.2 {
            Self::Ko
        } else {
            Self::En
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistics period granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Week,
    Month,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// A raw, unresolved occurrence of a typed name extracted from text.
/// Never persisted; consumed by the linker within the same invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMention {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Extraction confidence in [0, 1].
    pub confidence: f64,
    /// Short excerpt from the source text where the entity was found.
    pub context: String,
}

/// An extracted keyword with its relevance score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMention {
    pub term: String,
    pub relevance: f64,
}

/// Which sections the parser should extract. All enabled by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParseOptions {
    pub companies: bool,
    pub products: bool,
    pub components: bool,
    pub applications: bool,
    pub keywords: bool,
    pub summary: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            companies: true,
            products: true,
            components: true,
            applications: true,
            keywords: true,
            summary: true,
        }
    }
}

/// Structured output of the parser and the research adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub companies: Vec<EntityMention>,
    pub products: Vec<EntityMention>,
    pub components: Vec<EntityMention>,
    pub applications: Vec<EntityMention>,
    pub keywords: Vec<KeywordMention>,
    pub summary: String,
    pub detected_language: Language,
}

impl ParseResult {
    /// An empty result in the given language.
    pub fn empty(language: Language) -> Self {
        Self {
            companies: Vec::new(),
            products: Vec::new(),
            components: Vec::new(),
            applications: Vec::new(),
            keywords: Vec::new(),
            summary: String::new(),
            detected_language: language,
        }
    }

    /// All typed mentions, flattened for the linker. Keywords are not
    /// included; they are associated by term, not linked by candidate.
    pub fn typed_mentions(&self) -> Vec<EntityMention> {
        self.companies
            .iter()
            .chain(&self.products)
            .chain(&self.components)
            .chain(&self.applications)
            .cloned()
            .collect()
    }
}

/// Clamp a score to [0, 1].
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
