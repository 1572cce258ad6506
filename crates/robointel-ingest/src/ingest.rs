//! Article ingestion: fingerprint → dedup → persist → keyword association.
//!
//! The raw article body is used for fingerprinting and keyword extraction,
//! then discarded; only metadata and the summary are persisted.

use tracing::{debug, info};

use crate::fingerprint::{check_duplicate, fingerprint};
use robointel_core::{Language, Result};
use robointel_extract::dictionary;
use robointel_store::{NewDocument, Store};

/// An article submitted for ingestion.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    pub text: String,
    /// Overrides detection when supplied.
    pub language: Option<Language>,
    pub summary: Option<String>,
}

/// What happened to an ingestion attempt.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The article was persisted along with its keyword associations.
    Created {
        document_id: i64,
        keyword_count: usize,
    },
    /// An article with the same normalized content already exists; nothing
    /// was written.
    Duplicate { existing_id: i64 },
}

/// Handles article ingestion against a store.
pub struct Ingester<'a> {
    store: &'a Store,
}

impl<'a> Ingester<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Ingest an article. Duplicates are detected by content fingerprint
    /// before anything is written; new documents get their dictionary
    /// keywords associated for the statistics engine to aggregate.
    pub fn ingest_article(&self, article: &NewArticle) -> Result<IngestOutcome> {
        let digest = fingerprint(&article.text);

        let status = check_duplicate(self.store, &digest)?;
        if let Some(existing_id) = status.existing_id {
            info!(
                "Duplicate detected: hash={}.., existing document {}",
                &digest[..16],
                existing_id
            );
            return Ok(IngestOutcome::Duplicate { existing_id });
        }

        let language = article
            .language
            .unwrap_or_else(|| Language::detect(&article.text));

        let document_id = self.store.add_document(&NewDocument {
            title: article.title.clone(),
            source: article.source.clone(),
            url: article.url.clone(),
            language,
            summary: article.summary.clone(),
            content_hash: Some(digest),
            created_at: None,
        })?;

        let keywords = dictionary::extract_multilingual(&article.text);
        for kw in &keywords {
            let keyword_id =
                self.store
                    .find_or_create_keyword(&kw.term, kw.language, kw.category.as_deref())?;
            self.store.link_document_keyword(
                document_id,
                &keyword_id,
                kw.frequency as i64,
                kw.relevance,
            )?;
        }
        debug!(
            "Associated {} keywords with document {}",
            keywords.len(),
            document_id
        );

        info!("Ingested document {} ({})", document_id, language);
        Ok(IngestOutcome::Created {
            document_id,
            keyword_count: keywords.len(),
        })
    }
}
