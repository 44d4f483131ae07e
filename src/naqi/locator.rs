//! Maps the wall-clock "now" onto an index of the hourly time array.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Format of the hourly timestamps in the series, truncated to the hour.
const HOUR_FORMAT: &str = "%Y-%m-%dT%H:00";

/// Which lookup tier located the current hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The current hour is present verbatim in the time array.
    Exact,
    /// The latest timestamp not after the current hour.
    NearestPast,
    /// Every timestamp lies in the future; the last one is used.
    FallbackLatest,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::NearestPast => "nearest_past",
            MatchStrategy::FallbackLatest => "fallback_latest",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of locating the current hour in a series.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedHour {
    pub index: usize,
    /// The computed current hour in the series' local calendar, e.g. `2025-01-15T14:00`.
    pub current_time: String,
    pub strategy: MatchStrategy,
}

/// Formats `now` shifted by the series' UTC offset, truncated to the hour.
pub fn local_hour_string(now: DateTime<Utc>, utc_offset_seconds: i32) -> String {
    let local = now.naive_utc() + Duration::seconds(i64::from(utc_offset_seconds));
    local.format(HOUR_FORMAT).to_string()
}

/// Finds the index of the current hour using exact match, then nearest past, then latest.
///
/// Timestamps are compared as strings, which is chronological for the fixed
/// `YYYY-MM-DDTHH:MM` format. Returns `None` only when `times` is empty.
pub fn locate_current_hour(
    times: &[String],
    utc_offset_seconds: i32,
    now: DateTime<Utc>,
) -> Option<LocatedHour> {
    let current_time = local_hour_string(now, utc_offset_seconds);
    let last = times.len().checked_sub(1)?;

    let (index, strategy) = if let Some(idx) = times.iter().position(|t| *t == current_time) {
        (idx, MatchStrategy::Exact)
    } else if let Some(idx) = times.iter().rposition(|t| t.as_str() <= current_time.as_str()) {
        (idx, MatchStrategy::NearestPast)
    } else {
        (last, MatchStrategy::FallbackLatest)
    };

    debug!(
        "Located current hour {} at index {} via {}",
        current_time, index, strategy
    );

    Some(LocatedHour {
        index,
        current_time,
        strategy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hours(start_day: u32, count: u32) -> Vec<String> {
        (0..count)
            .map(|h| format!("2025-01-{:02}T{:02}:00", start_day + h / 24, h % 24))
            .collect()
    }

    #[test]
    fn test_applies_utc_offset_and_truncates() {
        // 08:47 UTC at UTC+05:30 is 14:17 local.
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 8, 47, 12).unwrap();
        assert_eq!(local_hour_string(now, 19_800), "2025-01-15T14:00");
        // Negative offsets can cross midnight backwards.
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 2, 10, 0).unwrap();
        assert_eq!(local_hour_string(now, -5 * 3600), "2025-01-14T21:00");
    }

    #[test]
    fn test_exact_match() {
        let times = hours(14, 48);
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 3, 30, 0).unwrap();
        let located = locate_current_hour(&times, 0, now).unwrap();
        assert_eq!(located.strategy, MatchStrategy::Exact);
        assert_eq!(located.index, 27);
        assert_eq!(located.current_time, "2025-01-15T03:00");
    }

    #[test]
    fn test_nearest_past_when_now_is_after_series() {
        let times = hours(14, 30);
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let located = locate_current_hour(&times, 0, now).unwrap();
        assert_eq!(located.strategy, MatchStrategy::NearestPast);
        assert_eq!(located.index, 29);
    }

    #[test]
    fn test_nearest_past_across_a_hole() {
        let mut times = hours(14, 48);
        times.remove(27);
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 3, 0, 0).unwrap();
        let located = locate_current_hour(&times, 0, now).unwrap();
        assert_eq!(located.strategy, MatchStrategy::NearestPast);
        assert_eq!(times[located.index], "2025-01-15T02:00");
    }

    #[test]
    fn test_fallback_latest_when_all_in_future() {
        let times = hours(14, 48);
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        let located = locate_current_hour(&times, 0, now).unwrap();
        assert_eq!(located.strategy, MatchStrategy::FallbackLatest);
        assert_eq!(located.index, 47);
    }

    #[test]
    fn test_empty_series() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 3, 0, 0).unwrap();
        assert_eq!(locate_current_hour(&[], 0, now), None);
    }
}
