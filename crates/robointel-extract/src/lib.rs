//! Robointel Extract — turns raw article text into typed entity mentions,
//! keywords and a summary.
//!
//! Two extractors share this crate: a deterministic bilingual dictionary
//! spotter, and an LLM-backed parser that falls back to the dictionary path
//! when no provider credential is configured or the provider fails.

pub mod dictionary;
pub mod parser;
pub mod provider;

pub use dictionary::{extract, extract_multilingual, DictionaryKeyword};
pub use parser::ArticleParser;
pub use provider::{retry_once, LlmClient};
