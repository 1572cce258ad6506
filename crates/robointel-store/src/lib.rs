//! Robointel Store — SQLite-backed canonical entity and document store.
//!
//! The pipeline treats the relational store as an external collaborator;
//! this crate embodies it: document rows keyed by content fingerprint,
//! canonical entity tables, alias rows, document↔keyword associations and
//! the keyword_stats upsert target.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::Store;
pub use types::*;
