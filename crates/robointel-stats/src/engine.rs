//! Period statistics computation over the document↔keyword associations.
//!
//! A period is `[start, start + 1 week|month)`. Counts sum the stored
//! per-document occurrence weights; deltas compare against the immediately
//! preceding period of equal length. Rows are upserted per
//! (keyword, period_type, period_start), so recomputation replaces rather
//! than duplicates.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime, Utc, Weekday};
use tracing::info;

use crate::types::*;
use robointel_core::{Error, PeriodType, Result};
use robointel_store::{KeywordStatRow, Store};

/// How many periods `recalculate_all` walks back from today.
const RECALC_PERIODS: usize = 12;

/// Computes and persists keyword period statistics.
pub struct StatsEngine<'a> {
    store: &'a Store,
}

impl<'a> StatsEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Compute stats for one period, sorted by count descending. Keywords
    /// with no occurrences in the period produce no row.
    pub fn calculate_period_stats(
        &self,
        period_start: NaiveDate,
        period_type: PeriodType,
    ) -> Result<Vec<PeriodStat>> {
        let period_end = period_end(period_start, period_type)?;
        let previous_start = period_before(period_start, period_type)?;

        let current = self
            .store
            .keyword_counts_between(millis(period_start), millis(period_end))?;
        let previous = self
            .store
            .keyword_counts_between(millis(previous_start), millis(period_start))?;

        let previous_by_keyword: HashMap<String, i64> = previous
            .into_iter()
            .map(|row| (row.keyword_id, row.count))
            .collect();

        let mut stats: Vec<PeriodStat> = current
            .into_iter()
            .map(|row| {
                let previous_count = previous_by_keyword.get(&row.keyword_id).copied().unwrap_or(0);
                let delta = row.count - previous_count;
                PeriodStat {
                    keyword_id: row.keyword_id,
                    term: row.term,
                    language: row.language,
                    period_type,
                    period_start,
                    period_end,
                    count: row.count,
                    delta,
                    delta_percent: delta_percent(row.count, previous_count, delta),
                }
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        Ok(stats)
    }

    /// Upsert computed stats, keyed by (keyword, period_type, period_start).
    pub fn save_stats(&self, stats: &[PeriodStat]) -> Result<()> {
        for stat in stats {
            self.store.upsert_keyword_stat(&KeywordStatRow {
                keyword_id: stat.keyword_id.clone(),
                period_type: stat.period_type,
                period_start: stat.period_start.to_string(),
                period_end: stat.period_end.to_string(),
                count: stat.count,
                delta: stat.delta,
                delta_percent: stat.delta_percent,
            })?;
        }
        Ok(())
    }

    /// Recompute and upsert the most recent 12 periods from today.
    /// Idempotent: running it twice yields the same stored rows.
    pub fn recalculate_all(&self, period_type: PeriodType) -> Result<usize> {
        self.recalculate_from(Utc::now().date_naive(), period_type)
    }

    /// Recompute from an explicit "today" (weeks align to Monday, months to
    /// day 1). Returns the number of stat rows processed.
    pub fn recalculate_from(&self, today: NaiveDate, period_type: PeriodType) -> Result<usize> {
        let origin = match period_type {
            PeriodType::Week => today.week(Weekday::Mon).first_day(),
            PeriodType::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .ok_or_else(|| Error::Internal("invalid month origin".into()))?,
        };

        let mut processed = 0;
        for steps_back in 0..RECALC_PERIODS {
            let period_start = match period_type {
                PeriodType::Week => origin - Duration::weeks(steps_back as i64),
                PeriodType::Month => origin
                    .checked_sub_months(Months::new(steps_back as u32))
                    .ok_or_else(|| Error::Internal("month arithmetic underflow".into()))?,
            };
            let stats = self.calculate_period_stats(period_start, period_type)?;
            self.save_stats(&stats)?;
            processed += stats.len();
        }

        info!(
            "Recalculated {} {} periods: {} stat rows",
            RECALC_PERIODS,
            period_type.as_str(),
            processed
        );
        Ok(processed)
    }

    /// The latest period's rows ranked by growth rate, classified up/down/
    /// stable by the sign of the delta.
    pub fn trending(
        &self,
        period_type: PeriodType,
        limit: usize,
        min_count: i64,
    ) -> Result<Vec<TrendingKeyword>> {
        let latest = match self.store.latest_period_start(period_type)? {
            Some(start) => start,
            None => return Ok(Vec::new()),
        };

        let mut rows: Vec<TrendingKeyword> = self
            .store
            .stats_for_period(period_type, &latest)?
            .into_iter()
            .filter(|row| row.stat.count >= min_count)
            .map(|row| TrendingKeyword {
                keyword_id: row.stat.keyword_id.clone(),
                term: row.term,
                language: row.language,
                category: row.category,
                current_count: row.stat.count,
                previous_count: (row.stat.count - row.stat.delta).max(0),
                delta: row.stat.delta,
                delta_percent: row.stat.delta_percent,
                trend: Trend::from_delta(row.stat.delta),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.delta_percent
                .partial_cmp(&a.delta_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.current_count.cmp(&a.current_count))
                .then_with(|| a.term.cmp(&b.term))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    /// Recent stats rows for one keyword in chronological order.
    pub fn keyword_history(
        &self,
        keyword_id: &str,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Vec<KeywordStatRow>> {
        let mut rows = self.store.keyword_history(keyword_id, period_type, limit)?;
        rows.reverse();
        Ok(rows)
    }
}

/// `100 * delta / previous`, with new keywords reported as +100% instead of
/// dividing by zero.
fn delta_percent(current: i64, previous: i64, delta: i64) -> f64 {
    let raw = if previous > 0 {
        delta as f64 / previous as f64 * 100.0
    } else if current > 0 {
        100.0
    } else {
        0.0
    };
    (raw * 100.0).round() / 100.0
}

fn period_end(start: NaiveDate, period_type: PeriodType) -> Result<NaiveDate> {
    match period_type {
        PeriodType::Week => Ok(start + Duration::weeks(1)),
        PeriodType::Month => start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| Error::Internal("month arithmetic overflow".into())),
    }
}

fn period_before(start: NaiveDate, period_type: PeriodType) -> Result<NaiveDate> {
    match period_type {
        PeriodType::Week => Ok(start - Duration::weeks(1)),
        PeriodType::Month => start
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| Error::Internal("month arithmetic underflow".into())),
    }
}

fn millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
