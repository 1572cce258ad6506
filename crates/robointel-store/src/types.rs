//! Row types for documents, entities, aliases and keyword statistics.

use robointel_core::{EntityType, Language, PeriodType};
use serde::{Deserialize, Serialize};

/// A document row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    pub id: i64,
    pub title: String,
    pub source: String,
    pub url: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub created_at: i64,
}

/// Fields for inserting a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub source: String,
    pub url: String,
    pub language: Language,
    pub summary: Option<String>,
    pub content_hash: Option<String>,
    /// Epoch milliseconds; defaults to now.
    pub created_at: Option<i64>,
}

impl Default for NewDocument {
    fn default() -> Self {
        Self {
            title: String::new(),
            source: String::new(),
            url: String::new(),
            language: Language::En,
            summary: None,
            content_hash: None,
            created_at: None,
        }
    }
}

/// A canonical entity's id and name, as consumed by the linker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRow {
    pub id: String,
    pub name: String,
}

/// A keyword row from the canonical keywords table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRow {
    pub id: String,
    pub term: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An alternate name for a company or product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasRow {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub alias_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Fields for inserting an alias.
#[derive(Debug, Clone)]
pub struct NewAlias {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub alias_name: String,
    pub language: Option<String>,
}

/// A keyword association on a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentKeyword {
    pub keyword: KeywordRow,
    pub frequency: i64,
    pub relevance: f64,
}

/// Aggregated keyword occurrence weight over a time window.
#[derive(Debug, Clone)]
pub struct KeywordPeriodCount {
    pub keyword_id: String,
    pub term: String,
    pub language: Language,
    pub count: i64,
}

/// A keyword_stats row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordStatRow {
    pub keyword_id: String,
    pub period_type: PeriodType,
    /// ISO date (YYYY-MM-DD) of the period's first day.
    pub period_start: String,
    /// ISO date of the first day after the period (half-open bound).
    pub period_end: String,
    pub count: i64,
    pub delta: i64,
    pub delta_percent: f64,
}

/// A keyword_stats row joined with its keyword, for trend views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordStatJoined {
    pub stat: KeywordStatRow,
    pub term: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
