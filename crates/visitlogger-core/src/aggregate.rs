//! Analytics aggregation over raw visit records.
//!
//! Two operations: resolving a page window for the reverse-chronological
//! listing, and folding a window of records into a fixed-length daily series
//! with zero-filled gaps. Both are pure so they can be tested without a
//! store.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::visit::VisitEvent;

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const DEFAULT_GRAPH_DAYS: u32 = 5;
/// The series is materialized at exactly `days` entries, so the window is
/// capped to keep a single request from allocating an unbounded vector.
pub const MAX_GRAPH_DAYS: u32 = 365;

/// Resolved listing window: `offset = (page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Resolve raw query parameters. Page floors at 1; a missing or zero
    /// limit falls back to the default (the dashboard has always sent
    /// `limit=0` to mean "default", so zero stays an alias for it).
    pub fn resolve(page: Option<u64>, limit: Option<u64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(n) => n,
        };
        Self {
            page,
            limit,
            offset: (page - 1) * limit,
        }
    }
}

/// One day of the graph series.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GraphPoint {
    pub date: String,
    pub count: i64,
}

/// Clamp the requested window length to `1..=MAX_GRAPH_DAYS`, defaulting to
/// [`DEFAULT_GRAPH_DAYS`].
pub fn resolve_graph_days(days: Option<u32>) -> u32 {
    days.unwrap_or(DEFAULT_GRAPH_DAYS).clamp(1, MAX_GRAPH_DAYS)
}

/// Midnight UTC at the start of the window `[today - (days - 1), today]`.
/// Anchored to calendar-day boundaries, not a rolling 24h multiple.
pub fn graph_window_start(today: NaiveDate, days: u32) -> DateTime<Utc> {
    let first_day = today - Duration::days(i64::from(days) - 1);
    first_day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Fold `visits` into one count per calendar day of the window, oldest
/// first, emitting exactly `days` entries with zeros for empty days.
///
/// Bucketing uses each record's client-reported `timestamp`, not the
/// server creation time the window was filtered on — a record whose client
/// clock disagrees with the server's may therefore land outside the window
/// and count nowhere, as may a record with an unparseable timestamp.
pub fn daily_visit_counts(visits: &[VisitEvent], today: NaiveDate, days: u32) -> Vec<GraphPoint> {
    let mut counts: HashMap<NaiveDate, i64> = HashMap::new();
    for visit in visits {
        if let Some(date) = client_date(&visit.timestamp) {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    let first_day = today - Duration::days(i64::from(days) - 1);
    (0..i64::from(days))
        .map(|offset| {
            let date = first_day + Duration::days(offset);
            GraphPoint {
                date: date.format("%Y-%m-%d").to_string(),
                count: counts.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// The UTC calendar date of a client-reported ISO-8601 timestamp. Falls back
/// to the leading `YYYY-MM-DD` for date-only strings; `None` for anything
/// that parses as neither.
fn client_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.naive_utc().date());
    }
    NaiveDate::parse_from_str(timestamp.get(..10)?, "%Y-%m-%d").ok()
}
