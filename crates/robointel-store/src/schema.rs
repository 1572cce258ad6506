//! Database schema SQL.

/// Documents and their keyword associations.
pub const DOCUMENT_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    source TEXT NOT NULL DEFAULT '',
    url TEXT NOT NULL DEFAULT '',
    language TEXT NOT NULL DEFAULT 'en',
    summary TEXT,
    content_hash TEXT UNIQUE,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash);
CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created_at);

CREATE TABLE IF NOT EXISTS document_keywords (
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    keyword_id TEXT NOT NULL REFERENCES keywords(id) ON DELETE CASCADE,
    frequency INTEGER NOT NULL DEFAULT 1,
    relevance REAL NOT NULL DEFAULT 0,
    UNIQUE(document_id, keyword_id)
);

CREATE INDEX IF NOT EXISTS idx_document_keywords_keyword ON document_keywords(keyword_id);
"#;

/// Canonical entity tables. Applications are intentionally absent: they are
/// extracted as mentions but have no canonical table to link against.
pub const ENTITY_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS companies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    country TEXT NOT NULL DEFAULT 'Unknown',
    category TEXT NOT NULL DEFAULT 'Other'
);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    company_id TEXT REFERENCES companies(id)
);

CREATE TABLE IF NOT EXISTS components (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL DEFAULT 'other'
);

CREATE TABLE IF NOT EXISTS keywords (
    id TEXT PRIMARY KEY,
    term TEXT NOT NULL,
    language TEXT NOT NULL DEFAULT 'en',
    category TEXT,
    UNIQUE(term, language)
);

CREATE TABLE IF NOT EXISTS entity_aliases (
    id TEXT PRIMARY KEY,
    entity_type TEXT NOT NULL CHECK (entity_type IN ('company', 'product')),
    entity_id TEXT NOT NULL,
    alias_name TEXT NOT NULL,
    language TEXT
);

CREATE INDEX IF NOT EXISTS idx_aliases_type ON entity_aliases(entity_type);
CREATE INDEX IF NOT EXISTS idx_aliases_entity ON entity_aliases(entity_type, entity_id);
"#;

/// Period statistics, upserted on (keyword, period_type, period_start).
pub const STATS_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS keyword_stats (
    keyword_id TEXT NOT NULL REFERENCES keywords(id) ON DELETE CASCADE,
    period_type TEXT NOT NULL CHECK (period_type IN ('week', 'month')),
    period_start TEXT NOT NULL,
    period_end TEXT NOT NULL,
    count INTEGER NOT NULL DEFAULT 0,
    delta INTEGER NOT NULL DEFAULT 0,
    delta_percent REAL NOT NULL DEFAULT 0,
    calculated_at INTEGER NOT NULL,
    UNIQUE(keyword_id, period_type, period_start)
);

CREATE INDEX IF NOT EXISTS idx_keyword_stats_period ON keyword_stats(period_type, period_start);
"#;
