//! Robointel Runtime — the programmatic boundary of the pipeline.
//!
//! Wires fingerprinting, extraction (parser or research adapter) and
//! linking into the two entry points callers consume, and delegates
//! ingestion and confirmation.

pub mod pipeline;
pub mod types;

pub use pipeline::Pipeline;
pub use types::{ArticleAnalysis, ResearchAnalysis};
