//! Trend window resolution and series extraction.
//!
//! A trend query is either an explicit `start`/`end` pair or a day count
//! ending today. The resolved window is handed to the store, and the logs it
//! returns are mapped one-to-one onto chart points.

use crate::{DailyMetrics, Error, Result, TrendPoint, TrendQuery, TrendWindow};
use chrono::{Duration, NaiveDate};

/// Resolve the inclusive date window for a trend query
///
/// Precedence:
/// 1. Both `start` and `end` present: used verbatim, even if `end < start`
/// 2. `days > 0`: the `days` calendar days ending on `today`
/// 3. Anything else is [`Error::InvalidRangeSpecification`]
pub fn resolve_window(query: &TrendQuery, today: NaiveDate) -> Result<TrendWindow> {
    if let (Some(start_date), Some(end_date)) = (query.start, query.end) {
        return Ok(TrendWindow {
            start_date,
            end_date,
        });
    }

    match query.days {
        Some(days) if days > 0 => {
            let start_date = Duration::try_days(days - 1)
                .and_then(|span| today.checked_sub_signed(span))
                .ok_or(Error::InvalidRangeSpecification)?;

            Ok(TrendWindow {
                start_date,
                end_date: today,
            })
        }
        _ => Err(Error::InvalidRangeSpecification),
    }
}

/// Map logs onto trend points, preserving order
///
/// Callers pass logs already restricted to the window and sorted ascending by
/// date; no filtering or sorting happens here.
pub fn build_series(logs: &[DailyMetrics]) -> Vec<TrendPoint> {
    logs.iter()
        .map(|log| TrendPoint {
            date: log.date,
            sleep_hours: log.sleep_hours,
            stress_level: log.stress_level,
        })
        .collect()
}
