//! Candidate and confirmation types for entity linking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use robointel_core::{EntityMention, EntityType};

/// Which search produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPath {
    /// Matched against the entity's canonical name.
    Direct,
    /// Matched against an alias, resolved back to the owning entity.
    Alias,
}

/// A ranked link candidate for one mention. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub entity_id: String,
    /// The entity's canonical name, even for alias matches.
    pub entity_name: String,
    pub entity_type: EntityType,
    pub similarity_score: f64,
    /// Pre-selected for the reviewer when the score reaches the
    /// auto-recommend threshold.
    pub is_auto_recommended: bool,
    pub matched_via: MatchPath,
    /// The alias text that matched, when `matched_via` is `Alias`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
}

/// Candidates per mention name, plus mentions with no candidates at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkResult {
    pub candidates: HashMap<String, Vec<LinkCandidate>>,
    pub unmatched: Vec<EntityMention>,
}

/// A reviewer-confirmed link between a mention and an existing entity.
/// Informational: the foreign-key writes happen in the consuming store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedLink {
    pub parsed_name: String,
    pub linked_entity_id: String,
}

/// A brand-new entity the reviewer asked to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Optional creation metadata (country, category, kind, language).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The reviewer's confirmation of a linking round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfirmation {
    pub links: Vec<ConfirmedLink>,
    pub new_entities: Vec<NewEntity>,
}

/// What a confirmation round actually accomplished.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConfirmOutcome {
    pub linked_count: usize,
    pub created_count: usize,
}
