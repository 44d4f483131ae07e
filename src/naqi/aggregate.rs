//! Coverage validation and worst-pollutant-wins aggregation.

use super::category::NaqiCategory;
use super::pollutant::Pollutant;
use super::result::{PollutantResult, SkippedPollutants};
use crate::error::NaqiError;
use std::collections::BTreeMap;

/// Qualified pollutants needed for a valid index.
pub const MIN_QUALIFIED_POLLUTANTS: usize = 3;

/// The overall index and the pollutant responsible for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub aqi: u16,
    pub category: NaqiCategory,
    pub prominent: Pollutant,
}

/// Validates pollutant coverage and selects the maximum sub-index.
///
/// Ties go to the pollutant declared first, since `results` iterates in declaration order.
///
/// # Errors
///
/// * `NaqiError::MissingCoreIndicator` if neither PM10 nor PM2.5 qualified.
/// * `NaqiError::InsufficientPollutantCoverage` if fewer than three pollutants qualified.
pub fn aggregate(
    results: &BTreeMap<Pollutant, PollutantResult>,
    skipped: &SkippedPollutants,
) -> Result<Aggregate, NaqiError> {
    let qualified: Vec<Pollutant> = results.keys().copied().collect();

    if !qualified.iter().any(Pollutant::is_core_indicator) {
        return Err(NaqiError::MissingCoreIndicator {
            qualified,
            skipped: skipped.clone(),
        });
    }

    if qualified.len() < MIN_QUALIFIED_POLLUTANTS {
        return Err(NaqiError::InsufficientPollutantCoverage {
            required: MIN_QUALIFIED_POLLUTANTS,
            qualified,
            skipped: skipped.clone(),
        });
    }

    let mut best: Option<(Pollutant, u16)> = None;
    for (pollutant, result) in results {
        match best {
            Some((_, aqi)) if result.sub_index <= aqi => {},
            _ => best = Some((*pollutant, result.sub_index)),
        }
    }

    // Non-empty: at least three pollutants qualified above.
    let (prominent, aqi) = best.ok_or_else(|| NaqiError::InsufficientPollutantCoverage {
        required: MIN_QUALIFIED_POLLUTANTS,
        qualified: Vec::new(),
        skipped: skipped.clone(),
    })?;

    Ok(Aggregate {
        aqi,
        category: NaqiCategory::from_index(aqi),
        prominent,
    })
}
