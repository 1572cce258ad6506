//! Robointel Ingest — content fingerprinting and the article ingestion path.
//!
//! Every document-ingestion path consults the fingerprint service before a
//! new document is persisted; new documents get their dictionary keywords
//! associated so the statistics engine has data to aggregate.

pub mod fingerprint;
pub mod ingest;

pub use fingerprint::{check_duplicate, fingerprint, DedupStatus};
pub use ingest::{IngestOutcome, Ingester, NewArticle};
