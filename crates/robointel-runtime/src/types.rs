//! Outcome types for the pipeline entry points.

use serde::{Deserialize, Serialize};

use robointel_core::ParseResult;
use robointel_link::LinkResult;
use robointel_research::SearchResponse;

/// Result of analyzing one raw article: the content fingerprint (and any
/// existing document sharing it), the extraction output, and the linker's
/// candidates for the external confirmation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub fingerprint: String,
    /// Set when a document with the same normalized content already exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<i64>,
    pub parse: ParseResult,
    pub links: LinkResult,
}

/// Result of a research query run through the same linking stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchAnalysis {
    pub response: SearchResponse,
    pub parse: ParseResult,
    pub links: LinkResult,
}
