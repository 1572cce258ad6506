//! Robointel Research — asks an external language-model provider to research
//! a query and return structured facts instead of parsing a given document.
//!
//! The response carries facts only, never reproduced article text, and is
//! normalized into the same `ParseResult` shape the parser produces so the
//! linker is agnostic about where mentions came from.

pub mod agent;
pub mod types;

pub use agent::{to_parse_result, ResearchAgent};
pub use types::{SearchRequest, SearchResponse, SourceReference, StructuredFact, TimeRange};
