//! Partitions the lookback horizon into calendar-quarter windows.
//!
//! Upstream search APIs cap results per call and rate-limit aggressively;
//! quarter-sized windows keep the call count bounded while staying small
//! enough that the per-call result cap doesn't swallow relevant stories.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use news_core::TimeWindow;

/// Generate non-overlapping calendar-quarter windows covering
/// `lookback_years` years: most recent year first, January-to-December
/// order within a year. A zero horizon yields an empty plan.
pub fn quarter_windows(now: DateTime<Utc>, lookback_years: u32) -> Vec<TimeWindow> {
    let mut windows = Vec::with_capacity(lookback_years as usize * 4);

    for year_offset in 0..lookback_years as i32 {
        let year = now.year() - year_offset;
        for quarter in 0..4 {
            let from = quarter_start(year, quarter);
            let next = if quarter == 3 {
                quarter_start(year + 1, 0)
            } else {
                quarter_start(year, quarter + 1)
            };
            windows.push(TimeWindow {
                from,
                to: next - Duration::seconds(1),
            });
        }
    }

    windows
}

fn quarter_start(year: i32, quarter: u32) -> DateTime<Utc> {
    let month = quarter * 3 + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
