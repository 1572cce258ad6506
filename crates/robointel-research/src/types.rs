//! Request and response types for the research adapter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use robointel_core::{EntityType, Provider};

/// The time window a research query should cover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A structured research request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Entity categories the caller wants facts about.
    pub target_types: Vec<EntityType>,
    pub time_range: TimeRange,
    pub region: String,
    pub provider: Provider,
}

/// One fact returned by the provider: a named entity with a short
/// description and the provider's confidence in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredFact {
    pub category: EntityType,
    pub name: String,
    pub description: String,
    pub confidence: f64,
}

/// A reference to where the provider drew a fact from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReference {
    pub domain: String,
    pub title: String,
}

/// The adapter's normalized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub summary: String,
    pub facts: Vec<StructuredFact>,
    pub sources: Vec<SourceReference>,
}
