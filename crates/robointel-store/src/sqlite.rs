//! SQLite-backed canonical entity and document store.
//!
//! Embodies the relational collaborator the pipeline consumes: documents
//! with unique content fingerprints, canonical entity tables, alias rows
//! for recall-widening, the document↔keyword association table, and the
//! keyword_stats upsert target.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::schema::{DOCUMENT_SCHEMA_SQL, ENTITY_SCHEMA_SQL, STATS_SCHEMA_SQL};
use crate::types::*;
use robointel_core::{EntityType, Error, Language, PeriodType, Result};

/// SQLite store guarding a single connection.
pub struct Store {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl Store {
    /// Open or create the store. `db_dir` is a directory; the file will be
    /// `db_dir/robointel.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("robointel.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let doc_count = store.count_documents()?;
        info!(
            "Store initialized: {} documents, path={}",
            doc_count,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        // Entity tables first: document_keywords references keywords.
        let full_schema = format!(
            "{}\n{}\n{}",
            ENTITY_SCHEMA_SQL, DOCUMENT_SCHEMA_SQL, STATS_SCHEMA_SQL
        );
        conn.execute_batch(&full_schema)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------

    /// Insert a document. Returns the new document ID. A content-hash
    /// collision surfaces as `Error::DuplicateContent`.
    pub fn add_document(&self, doc: &NewDocument) -> Result<i64> {
        let now = doc.created_at.unwrap_or_else(now_millis);
        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO documents (title, source, url, language, summary, content_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                doc.title,
                doc.source,
                doc.url,
                doc.language.as_str(),
                doc.summary,
                doc.content_hash,
                now
            ])
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint") {
                    Error::DuplicateContent(doc.content_hash.clone().unwrap_or_default())
                } else {
                    Error::Database(e.to_string())
                }
            })?;
        Ok(id)
    }

    /// Find a document by its content fingerprint.
    pub fn find_document_by_hash(&self, content_hash: &str) -> Result<Option<DocumentRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, title, source, url, language, summary, content_hash, created_at
             FROM documents WHERE content_hash = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![content_hash], row_to_document)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Get a document by ID.
    pub fn get_document(&self, doc_id: i64) -> Result<Option<DocumentRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, title, source, url, language, summary, content_hash, created_at
             FROM documents WHERE id = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![doc_id], row_to_document)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub fn count_documents(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT COUNT(*) FROM documents")
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row([], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Canonical entities
    // ---------------------------------------------------------------

    /// Create a company. Returns its new ID.
    pub fn create_company(&self, name: &str, country: &str, category: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.prepare_cached("INSERT INTO companies (id, name, country, category) VALUES (?1, ?2, ?3, ?4)")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![id, name, country, category])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Create a product, optionally owned by a company.
    pub fn create_product(&self, name: &str, company_id: Option<&str>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.prepare_cached("INSERT INTO products (id, name, company_id) VALUES (?1, ?2, ?3)")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![id, name, company_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Create a component.
    pub fn create_component(&self, name: &str, kind: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.prepare_cached("INSERT INTO components (id, name, kind) VALUES (?1, ?2, ?3)")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![id, name, kind])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Create a keyword. Fails on a (term, language) collision.
    pub fn create_keyword(
        &self,
        term: &str,
        language: Language,
        category: Option<&str>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.prepare_cached("INSERT INTO keywords (id, term, language, category) VALUES (?1, ?2, ?3, ?4)")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![id, term, language.as_str(), category])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Find a keyword by (term, language), creating it if absent.
    pub fn find_or_create_keyword(
        &self,
        term: &str,
        language: Language,
        category: Option<&str>,
    ) -> Result<String> {
        let existing: Option<String> = {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare_cached("SELECT id FROM keywords WHERE term = ?1 AND language = ?2")
                .map_err(|e| Error::Database(e.to_string()))?;
            stmt.query_row(params![term, language.as_str()], |row| row.get(0))
                .optional()
                .map_err(|e| Error::Database(e.to_string()))?
        };
        match existing {
            Some(id) => Ok(id),
            None => self.create_keyword(term, language, category),
        }
    }

    /// All canonical entities of a type, as (id, name) rows for similarity
    /// scoring. Applications have no canonical table and yield nothing.
    pub fn entities_by_type(&self, entity_type: EntityType) -> Result<Vec<EntityRow>> {
        let sql = match entity_type {
            EntityType::Company => "SELECT id, name FROM companies",
            EntityType::Product => "SELECT id, name FROM products",
            EntityType::Component => "SELECT id, name FROM components",
            EntityType::Keyword => "SELECT id, term FROM keywords",
            EntityType::Application => return Ok(Vec::new()),
        };
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(EntityRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    /// The canonical name of an entity, if it exists.
    pub fn entity_name(&self, entity_type: EntityType, entity_id: &str) -> Result<Option<String>> {
        let sql = match entity_type {
            EntityType::Company => "SELECT name FROM companies WHERE id = ?1",
            EntityType::Product => "SELECT name FROM products WHERE id = ?1",
            EntityType::Component => "SELECT name FROM components WHERE id = ?1",
            EntityType::Keyword => "SELECT term FROM keywords WHERE id = ?1",
            EntityType::Application => return Ok(None),
        };
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![entity_id], |row| row.get(0))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Aliases
    // ---------------------------------------------------------------

    /// Register an alternate name for a company or product. Returns the new
    /// alias ID; other entity types are rejected.
    pub fn add_alias(&self, alias: &NewAlias) -> Result<String> {
        if !alias.entity_type.supports_aliases() {
            return Err(Error::InvalidInput(format!(
                "entity type '{}' does not support aliases",
                alias.entity_type
            )));
        }
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO entity_aliases (id, entity_type, entity_id, alias_name, language)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            id,
            alias.entity_type.as_str(),
            alias.entity_id,
            alias.alias_name,
            alias.language
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(id)
    }

    /// Register a batch of aliases (seed data). Invalid or failing rows are
    /// logged and skipped; returns the number actually inserted.
    pub fn bulk_add_aliases(&self, aliases: &[NewAlias]) -> usize {
        let mut inserted = 0;
        for alias in aliases {
            match self.add_alias(alias) {
                Ok(_) => inserted += 1,
                Err(e) => warn!("Skipping alias '{}': {}", alias.alias_name, e),
            }
        }
        inserted
    }

    /// All alias rows for an entity type.
    pub fn aliases_by_type(&self, entity_type: EntityType) -> Result<Vec<AliasRow>> {
        if !entity_type.supports_aliases() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, entity_type, entity_id, alias_name, language
                 FROM entity_aliases WHERE entity_type = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![entity_type.as_str()], row_to_alias)
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    /// Alias rows for one entity.
    pub fn aliases_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AliasRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, entity_type, entity_id, alias_name, language
                 FROM entity_aliases WHERE entity_type = ?1 AND entity_id = ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![entity_type.as_str(), entity_id], row_to_alias)
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    /// Delete an alias by ID.
    pub fn remove_alias(&self, alias_id: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached("DELETE FROM entity_aliases WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![alias_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Document ↔ keyword associations
    // ---------------------------------------------------------------

    /// Associate a keyword with a document, replacing any prior association.
    pub fn link_document_keyword(
        &self,
        document_id: i64,
        keyword_id: &str,
        frequency: i64,
        relevance: f64,
    ) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO document_keywords (document_id, keyword_id, frequency, relevance)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(document_id, keyword_id)
             DO UPDATE SET frequency = excluded.frequency, relevance = excluded.relevance",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![document_id, keyword_id, frequency, relevance])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Keywords associated with a document.
    pub fn keywords_for_document(&self, document_id: i64) -> Result<Vec<DocumentKeyword>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT k.id, k.term, k.language, k.category, dk.frequency, dk.relevance
                 FROM document_keywords dk
                 JOIN keywords k ON k.id = dk.keyword_id
                 WHERE dk.document_id = ?1",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![document_id], |row| {
                Ok(DocumentKeyword {
                    keyword: KeywordRow {
                        id: row.get(0)?,
                        term: row.get(1)?,
                        language: parse_language(&row.get::<_, String>(2)?),
                        category: row.get(3)?,
                    },
                    frequency: row.get(4)?,
                    relevance: row.get(5)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    /// Per-keyword occurrence weight summed over documents created in
    /// `[start_ms, end_ms)`.
    pub fn keyword_counts_between(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<KeywordPeriodCount>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT k.id, k.term, k.language, SUM(dk.frequency)
                 FROM document_keywords dk
                 JOIN keywords k ON k.id = dk.keyword_id
                 JOIN documents d ON d.id = dk.document_id
                 WHERE d.created_at >= ?1 AND d.created_at < ?2
                 GROUP BY k.id, k.term, k.language",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![start_ms, end_ms], |row| {
                Ok(KeywordPeriodCount {
                    keyword_id: row.get(0)?,
                    term: row.get(1)?,
                    language: parse_language(&row.get::<_, String>(2)?),
                    count: row.get(3)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    // ---------------------------------------------------------------
    // Keyword statistics
    // ---------------------------------------------------------------

    /// Upsert a period stat, keyed by (keyword, period_type, period_start).
    /// Recomputing a period replaces its row, never duplicates it.
    pub fn upsert_keyword_stat(&self, stat: &KeywordStatRow) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO keyword_stats
                 (keyword_id, period_type, period_start, period_end, count, delta, delta_percent, calculated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(keyword_id, period_type, period_start)
             DO UPDATE SET period_end = excluded.period_end,
                           count = excluded.count,
                           delta = excluded.delta,
                           delta_percent = excluded.delta_percent,
                           calculated_at = excluded.calculated_at",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            stat.keyword_id,
            stat.period_type.as_str(),
            stat.period_start,
            stat.period_end,
            stat.count,
            stat.delta,
            stat.delta_percent,
            now_millis()
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// The most recent period_start with stored stats for a period type.
    pub fn latest_period_start(&self, period_type: PeriodType) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT MAX(period_start) FROM keyword_stats WHERE period_type = ?1")
            .map_err(|e| Error::Database(e.to_string()))?;
        stmt.query_row(params![period_type.as_str()], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// All stats for one period, joined with their keywords.
    pub fn stats_for_period(
        &self,
        period_type: PeriodType,
        period_start: &str,
    ) -> Result<Vec<KeywordStatJoined>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT s.keyword_id, s.period_type, s.period_start, s.period_end,
                        s.count, s.delta, s.delta_percent, k.term, k.language, k.category
                 FROM keyword_stats s
                 JOIN keywords k ON k.id = s.keyword_id
                 WHERE s.period_type = ?1 AND s.period_start = ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![period_type.as_str(), period_start], |row| {
                Ok(KeywordStatJoined {
                    stat: row_to_stat(row)?,
                    term: row.get(7)?,
                    language: parse_language(&row.get::<_, String>(8)?),
                    category: row.get(9)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }

    /// Recent stats rows for one keyword, newest first.
    pub fn keyword_history(
        &self,
        keyword_id: &str,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Vec<KeywordStatRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT keyword_id, period_type, period_start, period_end, count, delta, delta_percent
                 FROM keyword_stats
                 WHERE keyword_id = ?1 AND period_type = ?2
                 ORDER BY period_start DESC
                 LIMIT ?3",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![keyword_id, period_type.as_str(), limit as i64], |row| {
                row_to_stat(row)
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn parse_language(value: &str) -> Language {
    match value {
        "ko" => Language::Ko,
        _ => Language::En,
    }
}

fn parse_period_type(value: &str) -> PeriodType {
    match value {
        "month" => PeriodType::Month,
        _ => PeriodType::Week,
    }
}

fn parse_entity_type(value: &str) -> EntityType {
    match value {
        "company" => EntityType::Company,
        "product" => EntityType::Product,
        "component" => EntityType::Component,
        "application" => EntityType::Application,
        _ => EntityType::Keyword,
    }
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        title: row.get(1)?,
        source: row.get(2)?,
        url: row.get(3)?,
        language: parse_language(&row.get::<_, String>(4)?),
        summary: row.get(5)?,
        content_hash: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn row_to_alias(row: &Row<'_>) -> rusqlite::Result<AliasRow> {
    Ok(AliasRow {
        id: row.get(0)?,
        entity_type: parse_entity_type(&row.get::<_, String>(1)?),
        entity_id: row.get(2)?,
        alias_name: row.get(3)?,
        language: row.get(4)?,
    })
}

fn row_to_stat(row: &Row<'_>) -> rusqlite::Result<KeywordStatRow> {
    Ok(KeywordStatRow {
        keyword_id: row.get(0)?,
        period_type: parse_period_type(&row.get::<_, String>(1)?),
        period_start: row.get(2)?,
        period_end: row.get(3)?,
        count: row.get(4)?,
        delta: row.get(5)?,
        delta_percent: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_document_roundtrip() {
        let (store, _dir) = test_store();
        let id = store
            .add_document(&NewDocument {
                title: "Robot X launched".into(),
                source: "newswire".into(),
                language: Language::En,
                content_hash: Some("abc".into()),
                ..Default::default()
            })
            .unwrap();
        let doc = store.get_document(id).unwrap().unwrap();
        assert_eq!(doc.title, "Robot X launched");
        assert_eq!(doc.content_hash.as_deref(), Some("abc"));

        let found = store.find_document_by_hash("abc").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(store.find_document_by_hash("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_hash_rejected() {
        let (store, _dir) = test_store();
        let doc = NewDocument {
            title: "first".into(),
            content_hash: Some("same".into()),
            ..Default::default()
        };
        store.add_document(&doc).unwrap();
        let err = store.add_document(&doc).unwrap_err();
        assert!(matches!(err, Error::DuplicateContent(h) if h == "same"));
    }

    #[test]
    fn test_entities_by_type() {
        let (store, _dir) = test_store();
        store.create_company("RobotCo", "US", "Manufacturer").unwrap();
        store.create_component("Harmonic Drive", "gearbox").unwrap();

        let companies = store.entities_by_type(EntityType::Company).unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "RobotCo");

        assert!(store.entities_by_type(EntityType::Product).unwrap().is_empty());
        assert!(store
            .entities_by_type(EntityType::Application)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_find_or_create_keyword_is_idempotent() {
        let (store, _dir) = test_store();
        let a = store
            .find_or_create_keyword("actuator", Language::En, Some("component"))
            .unwrap();
        let b = store
            .find_or_create_keyword("actuator", Language::En, None)
            .unwrap();
        assert_eq!(a, b);

        // Same term in another language is a distinct keyword.
        let c = store
            .find_or_create_keyword("actuator", Language::Ko, None)
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_alias_rejects_non_aliasable_type() {
        let (store, _dir) = test_store();
        let err = store
            .add_alias(&NewAlias {
                entity_type: EntityType::Component,
                entity_id: "x".into(),
                alias_name: "감속기".into(),
                language: Some("ko".into()),
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_alias_roundtrip() {
        let (store, _dir) = test_store();
        let company_id = store.create_company("RobotCo", "US", "Manufacturer").unwrap();
        store
            .add_alias(&NewAlias {
                entity_type: EntityType::Company,
                entity_id: company_id.clone(),
                alias_name: "로봇회사".into(),
                language: Some("ko".into()),
            })
            .unwrap();

        let aliases = store.aliases_by_type(EntityType::Company).unwrap();
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases[0].alias_name, "로봇회사");
        assert_eq!(aliases[0].entity_id, company_id);

        let for_entity = store
            .aliases_for_entity(EntityType::Company, &company_id)
            .unwrap();
        assert_eq!(for_entity.len(), 1);

        store.remove_alias(&for_entity[0].id).unwrap();
        assert!(store.aliases_by_type(EntityType::Company).unwrap().is_empty());
    }

    #[test]
    fn test_document_keyword_upsert() {
        let (store, _dir) = test_store();
        let doc_id = store
            .add_document(&NewDocument {
                title: "t".into(),
                ..Default::default()
            })
            .unwrap();
        let kw_id = store
            .find_or_create_keyword("actuator", Language::En, None)
            .unwrap();

        store.link_document_keyword(doc_id, &kw_id, 3, 0.4).unwrap();
        store.link_document_keyword(doc_id, &kw_id, 5, 0.6).unwrap();

        let kws = store.keywords_for_document(doc_id).unwrap();
        assert_eq!(kws.len(), 1);
        assert_eq!(kws[0].frequency, 5);
        assert!((kws[0].relevance - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_keyword_counts_window_is_half_open() {
        let (store, _dir) = test_store();
        let kw_id = store
            .find_or_create_keyword("humanoid", Language::En, None)
            .unwrap();

        for (ts, freq) in [(1_000, 2), (2_000, 3), (3_000, 7)] {
            let doc_id = store
                .add_document(&NewDocument {
                    title: format!("doc-{ts}"),
                    created_at: Some(ts),
                    ..Default::default()
                })
                .unwrap();
            store.link_document_keyword(doc_id, &kw_id, freq, 0.5).unwrap();
        }

        // [1000, 3000) picks up the first two documents only.
        let counts = store.keyword_counts_between(1_000, 3_000).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 5);
    }

    #[test]
    fn test_stat_upsert_replaces_row() {
        let (store, _dir) = test_store();
        let kw_id = store
            .find_or_create_keyword("actuator", Language::En, None)
            .unwrap();
        let mut stat = KeywordStatRow {
            keyword_id: kw_id.clone(),
            period_type: PeriodType::Week,
            period_start: "2026-07-27".into(),
            period_end: "2026-08-03".into(),
            count: 10,
            delta: 4,
            delta_percent: 66.67,
        };
        store.upsert_keyword_stat(&stat).unwrap();
        stat.count = 12;
        stat.delta = 6;
        store.upsert_keyword_stat(&stat).unwrap();

        let rows = store
            .stats_for_period(PeriodType::Week, "2026-07-27")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stat.count, 12);
        assert_eq!(rows[0].term, "actuator");
    }

    #[test]
    fn test_keyword_history_newest_first() {
        let (store, _dir) = test_store();
        let kw_id = store
            .find_or_create_keyword("actuator", Language::En, None)
            .unwrap();
        for (start, end, count) in [
            ("2026-07-13", "2026-07-20", 1),
            ("2026-07-20", "2026-07-27", 2),
            ("2026-07-27", "2026-08-03", 3),
        ] {
            store
                .upsert_keyword_stat(&KeywordStatRow {
                    keyword_id: kw_id.clone(),
                    period_type: PeriodType::Week,
                    period_start: start.into(),
                    period_end: end.into(),
                    count,
                    delta: 0,
                    delta_percent: 0.0,
                })
                .unwrap();
        }
        let history = store.keyword_history(&kw_id, PeriodType::Week, 2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].period_start, "2026-07-27");
        assert_eq!(history[1].period_start, "2026-07-20");

        assert_eq!(
            store.latest_period_start(PeriodType::Week).unwrap().as_deref(),
            Some("2026-07-27")
        );
        assert_eq!(store.latest_period_start(PeriodType::Month).unwrap(), None);
    }
}
