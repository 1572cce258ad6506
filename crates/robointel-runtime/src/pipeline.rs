//! Pipeline — coordinates fingerprinting, extraction and linking.
//!
//! A raw document or query enters either the parser or the research
//! adapter; the resulting mentions go to the linker, whose candidates and
//! unmatched lists are returned to the caller for confirmation. Nothing in
//! between is persisted: mentions and candidates live and die inside one
//! invocation.

use tracing::{debug, info};

use crate::types::*;
use robointel_core::{Language, ParseOptions, PeriodType, ProviderConfig, Result};
use robointel_extract::ArticleParser;
use robointel_ingest::{check_duplicate, fingerprint, IngestOutcome, Ingester, NewArticle};
use robointel_link::{ConfirmOutcome, EntityLinker, LinkConfirmation};
use robointel_research::{to_parse_result, ResearchAgent, SearchRequest};
use robointel_stats::{StatsEngine, TrendingKeyword};
use robointel_store::Store;

/// Top-level pipeline over a canonical entity store.
pub struct Pipeline {
    parser: ArticleParser,
    agent: ResearchAgent,
}

impl Pipeline {
    /// Build a pipeline from provider configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            parser: ArticleParser::new(config.clone())?,
            agent: ResearchAgent::new(config)?,
        })
    }

    /// Build a pipeline from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env())
    }

    /// Analyze a raw article: fingerprint it, extract mentions, and search
    /// link candidates. The caller (a human reviewer or an automated
    /// confirmation step) decides what to do with duplicates and links.
    pub async fn analyze_article(
        &self,
        store: &Store,
        text: &str,
        language: Option<Language>,
        options: ParseOptions,
    ) -> Result<ArticleAnalysis> {
        let digest = fingerprint(text);
        let dedup = check_duplicate(store, &digest)?;
        if dedup.is_duplicate {
            info!("analyze: content matches existing document {:?}", dedup.existing_id);
        }

        let parse = self.parser.parse(text, language, options).await?;

        let linker = EntityLinker::new(store);
        let mentions = parse.typed_mentions();
        let links = linker.find_candidates(&mentions);
        debug!(
            "analyze: {} mentions, {} with candidates, {} unmatched",
            mentions.len(),
            links.candidates.len(),
            links.unmatched.len()
        );

        Ok(ArticleAnalysis {
            fingerprint: digest,
            duplicate_of: dedup.existing_id,
            parse,
            links,
        })
    }

    /// Run a research query and link the returned facts the same way
    /// parsed mentions are linked.
    pub async fn research(
        &self,
        store: &Store,
        request: &SearchRequest,
    ) -> Result<ResearchAnalysis> {
        let response = self.agent.search(request).await?;
        let parse = to_parse_result(&response);

        let linker = EntityLinker::new(store);
        let links = linker.find_candidates(&parse.typed_mentions());

        Ok(ResearchAnalysis {
            response,
            parse,
            links,
        })
    }

    /// Persist an article after review, with duplicate protection and
    /// keyword association.
    pub fn ingest(&self, store: &Store, article: &NewArticle) -> Result<IngestOutcome> {
        Ingester::new(store).ingest_article(article)
    }

    /// Apply a reviewer's link confirmation.
    pub fn confirm(&self, store: &Store, confirmation: &LinkConfirmation) -> ConfirmOutcome {
        EntityLinker::new(store).confirm_links(confirmation)
    }

    /// Recompute keyword statistics for the most recent periods. Run on a
    /// period boundary; idempotent.
    pub fn recalculate_stats(&self, store: &Store, period_type: PeriodType) -> Result<usize> {
        StatsEngine::new(store).recalculate_all(period_type)
    }

    /// The current trending view for the latest computed period.
    pub fn trending_keywords(
        &self,
        store: &Store,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Vec<TrendingKeyword>> {
        StatsEngine::new(store).trending(period_type, limit, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robointel_core::{EntityType, Error, Provider};
    use robointel_research::TimeRange;

    fn test_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    fn offline_pipeline() -> Pipeline {
        Pipeline::new(ProviderConfig::unconfigured()).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_article_offline_end_to_end() {
        let (store, _dir) = test_store();
        store.create_company("Tesla", "US", "Manufacturer").unwrap();

        let pipeline = offline_pipeline();
        let analysis = pipeline
            .analyze_article(
                &store,
                "Tesla unveiled a new actuator design for its humanoid robot line.",
                None,
                ParseOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(analysis.duplicate_of, None);
        assert_eq!(analysis.fingerprint.len(), 64);
        // Offline fallback produces keywords but no typed mentions, so the
        // linker has nothing to match or leave unmatched.
        assert!(!analysis.parse.keywords.is_empty());
        assert!(analysis.links.candidates.is_empty());
        assert!(analysis.links.unmatched.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_article_reports_duplicate() {
        let (store, _dir) = test_store();
        let pipeline = offline_pipeline();

        let text = "Robot X launched today with a new harmonic drive gearbox.";
        let outcome = pipeline
            .ingest(
                &store,
                &NewArticle {
                    title: "Robot X".into(),
                    text: text.into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let document_id = match outcome {
            IngestOutcome::Created { document_id, .. } => document_id,
            IngestOutcome::Duplicate { .. } => panic!("first ingest must not be a duplicate"),
        };

        let analysis = pipeline
            .analyze_article(&store, text, None, ParseOptions::default())
            .await
            .unwrap();
        assert_eq!(analysis.duplicate_of, Some(document_id));
    }

    #[tokio::test]
    async fn test_research_without_credential_is_config_error() {
        let (store, _dir) = test_store();
        let pipeline = offline_pipeline();

        let request = SearchRequest {
            query: "humanoid robot suppliers".into(),
            target_types: vec![EntityType::Company],
            time_range: TimeRange {
                start: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end: chrono::NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
            },
            region: "global".into(),
            provider: Provider::OpenAi,
        };
        let err = pipeline.research(&store, &request).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_ingest_then_stats_end_to_end() {
        let (store, _dir) = test_store();
        let pipeline = offline_pipeline();

        pipeline
            .ingest(
                &store,
                &NewArticle {
                    title: "Actuator roundup".into(),
                    text: "The actuator market grew as every humanoid program scaled up actuator orders.".into(),
                    ..Default::default()
                },
            )
            .unwrap();

        let processed = pipeline
            .recalculate_stats(&store, PeriodType::Week)
            .unwrap();
        assert!(processed > 0);

        let trending = pipeline
            .trending_keywords(&store, PeriodType::Week, 10)
            .unwrap();
        assert!(trending.iter().any(|t| t.term == "actuator"));
        // A keyword first seen this period reads as newly trending.
        let actuator = trending.iter().find(|t| t.term == "actuator").unwrap();
        assert_eq!(actuator.trend, robointel_stats::Trend::Up);
        assert_eq!(actuator.delta_percent, 100.0);
    }

    #[tokio::test]
    async fn test_confirm_creates_entities_visible_to_linker() {
        let (store, _dir) = test_store();
        let pipeline = offline_pipeline();

        let outcome = pipeline.confirm(
            &store,
            &LinkConfirmation {
                links: vec![],
                new_entities: vec![robointel_link::NewEntity {
                    name: "ActuCorp".into(),
                    entity_type: EntityType::Company,
                    metadata: serde_json::Value::Null,
                }],
            },
        );
        assert_eq!(outcome.created_count, 1);

        let linker = EntityLinker::new(&store);
        let candidates = linker.fuzzy_match("ActuCorp", EntityType::Company);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].is_auto_recommended);
    }
}
