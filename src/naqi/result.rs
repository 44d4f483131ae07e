//! Output records of a NAQI calculation.

use super::averaging::SkipReason;
use super::category::NaqiCategory;
use super::locator::MatchStrategy;
use super::pollutant::{AveragingPolicy, Pollutant};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A pair of series timestamps, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    /// First to last entry of a time array; empty strings for an empty array.
    pub fn spanning(times: &[String]) -> Self {
        Self {
            from: times.first().cloned().unwrap_or_default(),
            to: times.last().cloned().unwrap_or_default(),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}

/// Pollutants that did not qualify, with the reason, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SkippedPollutants(BTreeMap<Pollutant, SkipReason>);

impl SkippedPollutants {
    pub fn insert(&mut self, pollutant: Pollutant, reason: SkipReason) {
        self.0.insert(pollutant, reason);
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<&SkipReason> {
        self.0.get(&pollutant)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, &SkipReason)> {
        self.0.iter().map(|(p, r)| (*p, r))
    }
}

impl fmt::Display for SkippedPollutants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (pollutant, reason) in &self.0 {
            write!(f, "\n  {}: {}", pollutant.label(), reason)?;
        }
        Ok(())
    }
}

/// Sub-index details of a pollutant that qualified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantResult {
    pub label: &'static str,
    pub data_key: &'static str,
    /// Rounded to two decimals, in `unit`.
    pub concentration: f64,
    pub unit: &'static str,
    pub avg_type: AveragingPolicy,
    pub valid_hours: usize,
    pub total_hours: usize,
    pub sub_index: u16,
    pub category: NaqiCategory,
}

/// The complete, display-ready outcome of a NAQI calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NaqiResult {
    pub aqi: u16,
    pub category: NaqiCategory,
    pub color: &'static str,
    pub prominent_pollutant: &'static str,
    pub prominent_bp_key: Pollutant,
    /// European AQI at the located hour, if the input carried one.
    pub european_aqi: Option<f64>,
    /// US AQI at the located hour, if the input carried one.
    pub us_aqi: Option<f64>,
    pub period: TimeRange,
    pub current_time: String,
    pub match_strategy: MatchStrategy,
    pub data_range: TimeRange,
    pub total_data_hours: usize,
    pub valid_pollutant_count: usize,
    pub skipped_pollutants: SkippedPollutants,
    pub pollutants: BTreeMap<Pollutant, PollutantResult>,
}
