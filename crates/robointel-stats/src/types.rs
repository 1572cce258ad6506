//! Result types for the keyword statistics engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use robointel_core::{Language, PeriodType};

/// One keyword's occurrence count and change for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodStat {
    pub keyword_id: String,
    pub term: String,
    pub language: Language,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    /// First day after the period (half-open bound).
    pub period_end: NaiveDate,
    pub count: i64,
    /// `count` minus the same computation over the preceding period.
    pub delta: i64,
    pub delta_percent: f64,
}

/// Direction of a keyword's movement between periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Classify by the sign of the delta.
    pub fn from_delta(delta: i64) -> Self {
        match delta.cmp(&0) {
            std::cmp::Ordering::Greater => Self::Up,
            std::cmp::Ordering::Less => Self::Down,
            std::cmp::Ordering::Equal => Self::Stable,
        }
    }
}

/// A keyword ranked in the trending view of the latest period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingKeyword {
    pub keyword_id: String,
    pub term: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub current_count: i64,
    pub previous_count: i64,
    pub delta: i64,
    pub delta_percent: f64,
    pub trend: Trend,
}
