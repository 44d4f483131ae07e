//! Reduces a pollutant's 24-hour window to a single concentration according to its
//! averaging policy, or explains why it could not.
//!
//! Missing samples are skipped rather than treated as zero. Each policy has a minimum
//! number of valid samples below which the pollutant is disqualified for the run.

use super::pollutant::{AveragingPolicy, PollutantConfig};
use serde::{Serialize, Serializer};
use std::fmt;

/// Valid hours required for a 24-hour mean.
pub const MIN_VALID_DAILY_HOURS: usize = 16;
/// Width of a rolling window in hours.
pub const ROLLING_WINDOW_HOURS: usize = 8;
/// Valid hours required inside a single rolling window.
pub const MIN_VALID_ROLLING_HOURS: usize = 6;

/// Why a pollutant did not contribute a sub-index.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The input carries no column for the pollutant.
    KeyMissing,
    /// Every sample in the window is missing.
    AllMissing { total: usize },
    /// Too few valid samples for a 24-hour mean.
    InsufficientDailyCoverage {
        valid: usize,
        total: usize,
        required: usize,
    },
    /// No 8-hour window met its own coverage requirement.
    NoValidRollingWindow { window: usize, required: usize },
    /// The averaged concentration falls outside every breakpoint row.
    NoBreakpointMatch { concentration: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::KeyMissing => write!(f, "Key missing from data"),
            SkipReason::AllMissing { total } => write!(f, "All {total} values are null"),
            SkipReason::InsufficientDailyCoverage {
                valid,
                total,
                required,
            } => write!(f, "Only {valid}/{total} valid hours (need ≥{required})"),
            SkipReason::NoValidRollingWindow { window, required } => write!(
                f,
                "No valid {window}-hr window (each needs ≥{required} valid hours)"
            ),
            SkipReason::NoBreakpointMatch { concentration } => write!(
                f,
                "Concentration {concentration:.2} didn't match any breakpoint range"
            ),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A pollutant's reduced concentration and the coverage it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// In the unit of the pollutant's breakpoint table.
    pub concentration: f64,
    pub valid_hours: usize,
    pub total_hours: usize,
}

fn valid(value: &Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Mean of the valid values, or `None` if there are none.
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter_map(valid)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Highest mean over every 8-sample span with at least 6 valid samples.
fn max_rolling_mean(values: &[Option<f64>]) -> Option<f64> {
    values
        .windows(ROLLING_WINDOW_HOURS)
        .filter(|w| w.iter().filter_map(valid).count() >= MIN_VALID_ROLLING_HOURS)
        .filter_map(mean)
        .fold(None, |best: Option<f64>, avg| match best {
            Some(b) if b >= avg => Some(b),
            _ => Some(avg),
        })
}

/// Applies the pollutant's averaging policy to its window.
///
/// The unit conversion is applied to the mean for the 24-hour policy and to each sample
/// before rolling for the 8-hour policy; for a linear conversion the order is immaterial.
pub fn reduce_window(
    config: &PollutantConfig,
    window: &[Option<f64>],
) -> Result<Reduction, SkipReason> {
    let total_hours = window.len();
    let valid_hours = window.iter().filter_map(valid).count();

    if valid_hours == 0 {
        return Err(SkipReason::AllMissing { total: total_hours });
    }

    let concentration = match config.policy {
        AveragingPolicy::TwentyFourHour => {
            if valid_hours < MIN_VALID_DAILY_HOURS {
                return Err(SkipReason::InsufficientDailyCoverage {
                    valid: valid_hours,
                    total: total_hours,
                    required: MIN_VALID_DAILY_HOURS,
                });
            }
            let avg = mean(window).ok_or(SkipReason::AllMissing { total: total_hours })?;
            config.convert(avg)
        },
        AveragingPolicy::EightHourRollingMax => {
            let converted: Vec<Option<f64>> = window
                .iter()
                .map(|v| valid(v).map(|v| config.convert(v)))
                .collect();
            max_rolling_mean(&converted).ok_or(SkipReason::NoValidRollingWindow {
                window: ROLLING_WINDOW_HOURS,
                required: MIN_VALID_ROLLING_HOURS,
            })?
        },
    };

    Ok(Reduction {
        concentration,
        valid_hours,
        total_hours,
    })
}
