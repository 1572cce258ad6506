//! Entity linker — resolves extracted mentions to canonical entities.
//!
//! Each mention runs two independent searches: direct similarity against
//! canonical names, and alias similarity for the entity types that carry
//! aliases. Hits on the same entity merge keeping the higher score; the
//! merged list is re-ranked and capped. Linking is best-effort: a failing
//! store query yields an empty candidate list, never an error.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{error, warn};

use crate::similarity::trigram_similarity;
use crate::types::*;
use robointel_core::{EntityMention, EntityType, Language};
use robointel_store::Store;

/// Minimum similarity for a row to become a candidate at all.
const SIMILARITY_FLOOR: f64 = 0.4;
/// Candidates at or above this score are pre-selected for the reviewer.
const AUTO_RECOMMEND_THRESHOLD: f64 = 0.7;
const MAX_CANDIDATES: usize = 5;

/// Links mentions against the canonical entity store.
pub struct EntityLinker<'a> {
    store: &'a Store,
}

impl<'a> EntityLinker<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Search candidates for a batch of mentions. Mentions with zero
    /// candidates (even below the floor) land in `unmatched` and are
    /// candidates for creating a brand-new canonical entity.
    pub fn find_candidates(&self, mentions: &[EntityMention]) -> LinkResult {
        let mut result = LinkResult::default();
        for mention in mentions {
            let matches = self.fuzzy_match(&mention.name, mention.entity_type);
            if matches.is_empty() {
                result.unmatched.push(mention.clone());
            } else {
                result.candidates.insert(mention.name.clone(), matches);
            }
        }
        result
    }

    /// Candidates for one name: direct + alias searches, merged by entity,
    /// sorted by similarity descending (name ascending on ties) and capped
    /// at 5. Every returned candidate scores at least the floor.
    pub fn fuzzy_match(&self, name: &str, entity_type: EntityType) -> Vec<LinkCandidate> {
        let mut merged: HashMap<String, LinkCandidate> = HashMap::new();

        match self.store.entities_by_type(entity_type) {
            Ok(rows) => {
                for row in rows {
                    let score = trigram_similarity(name, &row.name);
                    if score >= SIMILARITY_FLOOR {
                        merge_candidate(
                            &mut merged,
                            LinkCandidate {
                                entity_id: row.id,
                                entity_name: row.name,
                                entity_type,
                                similarity_score: score,
                                is_auto_recommended: false,
                                matched_via: MatchPath::Direct,
                                alias_name: None,
                            },
                        );
                    }
                }
            }
            Err(e) => warn!("direct match query failed for type {}: {}", entity_type, e),
        }

        if entity_type.supports_aliases() {
            match self.store.aliases_by_type(entity_type) {
                Ok(aliases) => {
                    for alias in aliases {
                        let score = trigram_similarity(name, &alias.alias_name);
                        if score < SIMILARITY_FLOOR {
                            continue;
                        }
                        let canonical =
                            match self.store.entity_name(entity_type, &alias.entity_id) {
                                Ok(Some(canonical)) => canonical,
                                Ok(None) => {
                                    warn!(
                                        "alias '{}' points at missing {} {}",
                                        alias.alias_name, entity_type, alias.entity_id
                                    );
                                    continue;
                                }
                                Err(e) => {
                                    warn!("alias owner lookup failed: {}", e);
                                    continue;
                                }
                            };
                        merge_candidate(
                            &mut merged,
                            LinkCandidate {
                                entity_id: alias.entity_id,
                                entity_name: canonical,
                                entity_type,
                                similarity_score: score,
                                is_auto_recommended: false,
                                matched_via: MatchPath::Alias,
                                alias_name: Some(alias.alias_name),
                            },
                        );
                    }
                }
                Err(e) => warn!("alias match query failed for type {}: {}", entity_type, e),
            }
        }

        let mut candidates: Vec<LinkCandidate> = merged.into_values().collect();
        candidates.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.entity_name.cmp(&b.entity_name))
        });
        candidates.truncate(MAX_CANDIDATES);
        for candidate in &mut candidates {
            candidate.is_auto_recommended = candidate.similarity_score >= AUTO_RECOMMEND_THRESHOLD;
        }
        candidates
    }

    /// Apply a reviewer's confirmation: count the accepted links and create
    /// the requested new entities. Products and applications are
    /// intentionally not auto-createable. A single creation failure is
    /// logged and skipped so the batch completes with accurate counts.
    pub fn confirm_links(&self, confirmation: &LinkConfirmation) -> ConfirmOutcome {
        let mut created_count = 0;

        for entity in &confirmation.new_entities {
            let created = match entity.entity_type {
                EntityType::Company => self.store.create_company(
                    &entity.name,
                    metadata_str(&entity.metadata, "country").unwrap_or("Unknown"),
                    metadata_str(&entity.metadata, "category").unwrap_or("Other"),
                ),
                EntityType::Component => self.store.create_component(
                    &entity.name,
                    metadata_str(&entity.metadata, "kind").unwrap_or("other"),
                ),
                EntityType::Keyword => self.store.create_keyword(
                    &entity.name,
                    metadata_language(&entity.metadata),
                    metadata_str(&entity.metadata, "category"),
                ),
                EntityType::Product | EntityType::Application => {
                    warn!(
                        "skipping '{}': type {} is not auto-createable",
                        entity.name, entity.entity_type
                    );
                    continue;
                }
            };

            match created {
                Ok(_) => created_count += 1,
                Err(e) => error!("failed to create {} '{}': {}", entity.entity_type, entity.name, e),
            }
        }

        ConfirmOutcome {
            linked_count: confirmation.links.len(),
            created_count,
        }
    }
}

/// Keep the higher-scoring candidate when both searches hit one entity.
fn merge_candidate(merged: &mut HashMap<String, LinkCandidate>, candidate: LinkCandidate) {
    match merged.get(&candidate.entity_id) {
        Some(existing) if existing.similarity_score >= candidate.similarity_score => {}
        _ => {
            merged.insert(candidate.entity_id.clone(), candidate);
        }
    }
}

fn metadata_str<'v>(metadata: &'v Value, key: &str) -> Option<&'v str> {
    metadata.get(key).and_then(Value::as_str)
}

fn metadata_language(metadata: &Value) -> Language {
    match metadata_str(metadata, "language") {
        Some("ko") => Language::Ko,
        _ => Language::En,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robointel_store::NewAlias;
    use serde_json::json;

    fn test_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    fn mention(name: &str, entity_type: EntityType) -> EntityMention {
        EntityMention {
            name: name.into(),
            entity_type,
            confidence: 0.9,
            context: String::new(),
        }
    }

    #[test]
    fn test_candidates_sorted_capped_and_floored() {
        let (store, _dir) = test_store();
        for name in [
            "RobotCo",
            "RobotCo Inc",
            "RobotCo Labs",
            "RobotCo Korea",
            "RobotCo Systems",
            "RobotCorp",
            "Totally Different Name",
        ] {
            store.create_company(name, "US", "Manufacturer").unwrap();
        }

        let linker = EntityLinker::new(&store);
        let candidates = linker.fuzzy_match("RobotCo", EntityType::Company);

        assert_eq!(candidates.len(), MAX_CANDIDATES);
        for pair in candidates.windows(2) {
            assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
        for candidate in &candidates {
            assert!(candidate.similarity_score >= SIMILARITY_FLOOR);
            assert_ne!(candidate.entity_name, "Totally Different Name");
        }
        assert_eq!(candidates[0].entity_name, "RobotCo");
        assert_eq!(candidates[0].similarity_score, 1.0);
    }

    #[test]
    fn test_auto_recommend_threshold_boundary() {
        let (store, _dir) = test_store();
        store.create_company("RobotCo", "US", "Manufacturer").unwrap();
        store.create_company("RobotCo Inc", "US", "Manufacturer").unwrap();

        let linker = EntityLinker::new(&store);
        let candidates = linker.fuzzy_match("RobotCo", EntityType::Company);

        // Exact match at 1.0 is auto-recommended; "RobotCo Inc" scores
        // 8/12 ≈ 0.67, inside [0.4, 0.7) so offered but not pre-selected.
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].is_auto_recommended);
        assert!(!candidates[1].is_auto_recommended);
        for candidate in &candidates {
            assert_eq!(
                candidate.is_auto_recommended,
                candidate.similarity_score >= AUTO_RECOMMEND_THRESHOLD
            );
        }
    }

    #[test]
    fn test_alias_match_resolves_to_canonical_name() {
        let (store, _dir) = test_store();
        let company_id = store
            .create_company("Hyundai Robotics", "KR", "Manufacturer")
            .unwrap();
        store
            .add_alias(&NewAlias {
                entity_type: EntityType::Company,
                entity_id: company_id.clone(),
                alias_name: "현대로보틱스".into(),
                language: Some("ko".into()),
            })
            .unwrap();

        let linker = EntityLinker::new(&store);
        let candidates = linker.fuzzy_match("현대로보틱스", EntityType::Company);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].entity_id, company_id);
        assert_eq!(candidates[0].entity_name, "Hyundai Robotics");
        assert_eq!(candidates[0].matched_via, MatchPath::Alias);
        assert_eq!(candidates[0].alias_name.as_deref(), Some("현대로보틱스"));
        assert_eq!(candidates[0].similarity_score, 1.0);
        assert!(candidates[0].is_auto_recommended);
    }

    #[test]
    fn test_direct_and_alias_hits_merge_keeping_higher_score() {
        let (store, _dir) = test_store();
        // Direct name scores 8/12 ≈ 0.67 against "RobotCo"; the alias
        // scores exactly 1.0. The merged candidate keeps the alias score.
        let company_id = store
            .create_company("RobotCo Inc", "US", "Manufacturer")
            .unwrap();
        store
            .add_alias(&NewAlias {
                entity_type: EntityType::Company,
                entity_id: company_id.clone(),
                alias_name: "RobotCo".into(),
                language: None,
            })
            .unwrap();

        let linker = EntityLinker::new(&store);
        let candidates = linker.fuzzy_match("RobotCo", EntityType::Company);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].entity_id, company_id);
        assert_eq!(candidates[0].similarity_score, 1.0);
        assert_eq!(candidates[0].matched_via, MatchPath::Alias);
        assert_eq!(candidates[0].entity_name, "RobotCo Inc");
    }

    #[test]
    fn test_aliases_ignored_for_non_aliasable_types() {
        let (store, _dir) = test_store();
        store.create_component("Harmonic Drive", "gearbox").unwrap();

        let linker = EntityLinker::new(&store);
        let candidates = linker.fuzzy_match("Harmonic Drive", EntityType::Component);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].matched_via, MatchPath::Direct);
    }

    #[test]
    fn test_find_candidates_splits_matched_and_unmatched() {
        let (store, _dir) = test_store();
        store.create_company("RobotCo", "US", "Manufacturer").unwrap();

        let linker = EntityLinker::new(&store);
        let mentions = vec![
            mention("RobotCo", EntityType::Company),
            mention("Quantum Blender", EntityType::Company),
            // Applications have no canonical table: always unmatched.
            mention("Warehouse automation", EntityType::Application),
        ];
        let result = linker.find_candidates(&mentions);

        assert_eq!(result.candidates.len(), 1);
        assert!(result.candidates.contains_key("RobotCo"));
        assert_eq!(result.unmatched.len(), 2);
        assert!(result
            .unmatched
            .iter()
            .any(|m| m.name == "Warehouse automation"));
    }

    #[test]
    fn test_confirm_links_creates_supported_types() {
        let (store, _dir) = test_store();
        let linker = EntityLinker::new(&store);

        let confirmation = LinkConfirmation {
            links: vec![ConfirmedLink {
                parsed_name: "RobotCo".into(),
                linked_entity_id: "existing-id".into(),
            }],
            new_entities: vec![
                NewEntity {
                    name: "ActuCorp".into(),
                    entity_type: EntityType::Company,
                    metadata: json!({"country": "DE"}),
                },
                NewEntity {
                    name: "Torque sensor".into(),
                    entity_type: EntityType::Component,
                    metadata: json!({"kind": "sensor"}),
                },
                NewEntity {
                    name: "이족보행".into(),
                    entity_type: EntityType::Keyword,
                    metadata: json!({"language": "ko"}),
                },
                // Products are intentionally not auto-createable.
                NewEntity {
                    name: "Optimus".into(),
                    entity_type: EntityType::Product,
                    metadata: Value::Null,
                },
            ],
        };

        let outcome = linker.confirm_links(&confirmation);
        assert_eq!(outcome.linked_count, 1);
        assert_eq!(outcome.created_count, 3);

        let companies = store.entities_by_type(EntityType::Company).unwrap();
        assert!(companies.iter().any(|c| c.name == "ActuCorp"));
        assert!(store.entities_by_type(EntityType::Product).unwrap().is_empty());
    }

    #[test]
    fn test_confirm_links_survives_single_failure() {
        let (store, _dir) = test_store();
        let linker = EntityLinker::new(&store);

        let keyword = NewEntity {
            name: "actuator".into(),
            entity_type: EntityType::Keyword,
            metadata: Value::Null,
        };
        let first = linker.confirm_links(&LinkConfirmation {
            links: vec![],
            new_entities: vec![keyword.clone()],
        });
        assert_eq!(first.created_count, 1);

        // The same keyword again violates the (term, language) uniqueness;
        // the failure is skipped and the companion entity still lands.
        let second = linker.confirm_links(&LinkConfirmation {
            links: vec![],
            new_entities: vec![
                keyword,
                NewEntity {
                    name: "GripperWorks".into(),
                    entity_type: EntityType::Company,
                    metadata: Value::Null,
                },
            ],
        });
        assert_eq!(second.created_count, 1);
        assert!(store
            .entities_by_type(EntityType::Company)
            .unwrap()
            .iter()
            .any(|c| c.name == "GripperWorks"));
    }
}
