//! Robointel Stats — periodic keyword statistics with trend computation.
//!
//! On a period boundary the engine scans the document↔keyword association
//! table, computes per-keyword counts and deltas against the prior period,
//! and upserts one row per keyword per period.

pub mod engine;
pub mod types;

pub use engine::StatsEngine;
pub use types::{PeriodStat, Trend, TrendingKeyword};
