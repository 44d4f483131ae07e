//! National Air Quality Index (NAQI) engine.
//!
//! Converts an hourly pollutant series into a single index following the CPCB IND-AQI
//! standard:
//!
//! 1. Locate the current hour in the series using the data's UTC offset.
//! 2. Take the 24 hours ending at that hour.
//! 3. Reduce each pollutant: 24-hr mean for PM10, PM2.5, NO₂, SO₂, NH₃; maximum
//!    8-hr rolling mean for CO and O₃.
//! 4. Interpolate a sub-index per pollutant from its breakpoint table.
//! 5. Require PM10 or PM2.5 and at least three pollutants, then take the maximum.
//!
//! The engine is a pure function of its input and a single clock reading.

mod aggregate;
mod averaging;
mod breakpoints;
mod category;
mod locator;
mod pollutant;
mod result;
mod window;

pub use aggregate::{aggregate, Aggregate, MIN_QUALIFIED_POLLUTANTS};
pub use averaging::{
    reduce_window, Reduction, SkipReason, MIN_VALID_DAILY_HOURS, MIN_VALID_ROLLING_HOURS,
    ROLLING_WINDOW_HOURS,
};
pub use breakpoints::{breakpoints, sub_index, BreakpointRow, MAX_SUB_INDEX};
pub use category::{european_aqi_category, us_aqi_category, NaqiCategory};
pub use locator::{local_hour_string, locate_current_hour, LocatedHour, MatchStrategy};
pub use pollutant::{AveragingPolicy, Pollutant, PollutantConfig};
pub use result::{NaqiResult, PollutantResult, SkippedPollutants, TimeRange};
pub use window::{AnalysisWindow, WINDOW_HOURS};

use crate::error::NaqiError;
use crate::models::HourlyPollutantSeries;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Calculates the NAQI for `series` as of `now`.
///
/// `utc_offset_seconds` is the offset of the series' local calendar from UTC; the
/// series' timestamps are interpreted in that calendar. The caller supplies `now` so a
/// single instant is used throughout; see [`calculate_naqi_now`] to read the clock.
///
/// # Errors
///
/// Returns a [`NaqiError`] when there is not enough history, or when too few pollutants
/// (or neither particulate) produce a sub-index. Individual pollutants with poor data are
/// reported in [`NaqiResult::skipped_pollutants`] instead.
pub fn calculate_naqi(
    series: &HourlyPollutantSeries,
    utc_offset_seconds: i32,
    now: DateTime<Utc>,
) -> Result<NaqiResult, NaqiError> {
    let times = &series.time;

    let located = locate_current_hour(times, utc_offset_seconds, now).ok_or_else(|| {
        NaqiError::InsufficientHistory {
            required: WINDOW_HOURS,
            available: 0,
            current_time: local_hour_string(now, utc_offset_seconds),
            data_range: TimeRange::spanning(times),
        }
    })?;
    let window = AnalysisWindow::extract(times, &located)?;

    let mut pollutants = BTreeMap::new();
    let mut skipped = SkippedPollutants::default();

    for pollutant in Pollutant::ALL {
        match evaluate_pollutant(series, pollutant, &window) {
            Ok(result) => {
                debug!(
                    "{} qualified: {:.2} {} -> sub-index {}",
                    result.label, result.concentration, result.unit, result.sub_index
                );
                pollutants.insert(pollutant, result);
            },
            Err(reason) => {
                debug!("{} skipped: {}", pollutant.label(), reason);
                skipped.insert(pollutant, reason);
            },
        }
    }

    let Aggregate {
        aqi,
        category,
        prominent,
    } = aggregate(&pollutants, &skipped)?;

    let at_located = |column: &Option<Vec<Option<f64>>>| {
        column
            .as_ref()
            .and_then(|values| values.get(located.index).copied().flatten())
    };

    Ok(NaqiResult {
        aqi,
        category,
        color: category.color(),
        prominent_pollutant: prominent.label(),
        prominent_bp_key: prominent,
        european_aqi: at_located(&series.european_aqi),
        us_aqi: at_located(&series.us_aqi),
        period: window.period,
        current_time: located.current_time,
        match_strategy: located.strategy,
        data_range: TimeRange::spanning(times),
        total_data_hours: times.len(),
        valid_pollutant_count: pollutants.len(),
        skipped_pollutants: skipped,
        pollutants,
    })
}

/// Calculates the NAQI as of the current system time, read exactly once.
pub fn calculate_naqi_now(
    series: &HourlyPollutantSeries,
    utc_offset_seconds: i32,
) -> Result<NaqiResult, NaqiError> {
    calculate_naqi(series, utc_offset_seconds, Utc::now())
}

fn evaluate_pollutant(
    series: &HourlyPollutantSeries,
    pollutant: Pollutant,
    window: &AnalysisWindow,
) -> Result<PollutantResult, SkipReason> {
    let config = pollutant.config();
    let column = series.column(pollutant).ok_or(SkipReason::KeyMissing)?;
    let reduction = reduce_window(config, &window.samples(column))?;

    let sub_index = sub_index(pollutant, reduction.concentration).ok_or(
        SkipReason::NoBreakpointMatch {
            concentration: reduction.concentration,
        },
    )?;

    Ok(PollutantResult {
        label: config.label,
        data_key: pollutant.data_key(),
        concentration: (reduction.concentration * 100.0).round() / 100.0,
        unit: config.unit,
        avg_type: config.policy,
        valid_hours: reduction.valid_hours,
        total_hours: reduction.total_hours,
        sub_index,
        category: NaqiCategory::from_index(sub_index),
    })
}
