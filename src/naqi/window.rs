//! The 24-hour analysis window ending at the located hour.

use super::locator::LocatedHour;
use super::result::TimeRange;
use crate::error::NaqiError;

/// Number of hourly samples every pollutant is evaluated over.
pub const WINDOW_HOURS: usize = 24;

/// Index bounds of the 24 samples `[end - 23, end]` shared by all pollutants.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisWindow {
    pub start: usize,
    /// Inclusive; the located hour.
    pub end: usize,
    /// Timestamps of the first and last sample in the window.
    pub period: TimeRange,
}

impl AnalysisWindow {
    /// Builds the window ending at the located hour.
    ///
    /// # Errors
    ///
    /// Returns `NaqiError::InsufficientHistory` when fewer than 24 samples exist up to and
    /// including the located hour.
    pub fn extract(times: &[String], located: &LocatedHour) -> Result<Self, NaqiError> {
        let available = located.index + 1;
        if available < WINDOW_HOURS {
            return Err(NaqiError::InsufficientHistory {
                required: WINDOW_HOURS,
                available,
                current_time: located.current_time.clone(),
                data_range: TimeRange::spanning(times),
            });
        }

        let start = located.index + 1 - WINDOW_HOURS;
        let end = located.index;
        Ok(Self {
            start,
            end,
            period: TimeRange {
                from: times[start].clone(),
                to: times[end].clone(),
            },
        })
    }

    /// The samples of a pollutant column aligned with the window's timestamps.
    ///
    /// Always `WINDOW_HOURS` long. Positions past the end of a short column are missing.
    pub fn samples(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        (self.start..=self.end)
            .map(|i| values.get(i).copied().flatten())
            .collect()
    }
}
