//! Defines data structures for the application.
//!
//! Includes structs for:
//! - Deserializing Open-Meteo air-quality responses (`AirQualityResponse`, `HourlyPollutantSeries`).
//! - Deserializing Open-Meteo geocoding results (`GeocodingResponse`, `GeoLocation`).
//!
//! Field names follow the camelCase form used by saved snapshots; the snake_case names
//! returned by the live API are accepted as aliases.

use crate::error::{AppError, Result};
use crate::naqi::{calculate_naqi, calculate_naqi_now, NaqiResult, Pollutant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Hourly columns sharing a single time index.
///
/// A pollutant column is `None` when the key is absent from the input; individual
/// samples are `None` when the sensor reported nothing for that hour.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPollutantSeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub pm10: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "pm2_5")]
    pub pm25: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "nitrogen_dioxide")]
    pub nitrogen_dioxide: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "sulphur_dioxide")]
    pub sulphur_dioxide: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub ammonia: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "carbon_monoxide")]
    pub carbon_monoxide: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub ozone: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "european_aqi")]
    pub european_aqi: Option<Vec<Option<f64>>>,
    #[serde(default, alias = "us_aqi")]
    pub us_aqi: Option<Vec<Option<f64>>>,
}

impl HourlyPollutantSeries {
    /// The hourly column for a pollutant, if present in the input.
    pub fn column(&self, pollutant: Pollutant) -> Option<&[Option<f64>]> {
        let column = match pollutant {
            Pollutant::Pm10 => &self.pm10,
            Pollutant::Pm25 => &self.pm25,
            Pollutant::No2 => &self.nitrogen_dioxide,
            Pollutant::So2 => &self.sulphur_dioxide,
            Pollutant::Nh3 => &self.ammonia,
            Pollutant::Co => &self.carbon_monoxide,
            Pollutant::O3 => &self.ozone,
        };
        column.as_deref()
    }

    pub fn column_mut(&mut self, pollutant: Pollutant) -> &mut Option<Vec<Option<f64>>> {
        match pollutant {
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::No2 => &mut self.nitrogen_dioxide,
            Pollutant::So2 => &mut self.sulphur_dioxide,
            Pollutant::Nh3 => &mut self.ammonia,
            Pollutant::Co => &mut self.carbon_monoxide,
            Pollutant::O3 => &mut self.ozone,
        }
    }

    /// Checks the structural invariants the NAQI engine relies on.
    ///
    /// Every present column must be as long as `time`, and `time` must be non-decreasing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidData` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let expected = self.time.len();
        let mut lengths: Vec<(&str, Option<usize>)> = Pollutant::ALL
            .iter()
            .map(|p| (p.data_key(), self.column(*p).map(<[_]>::len)))
            .collect();
        lengths.push(("europeanAqi", self.european_aqi.as_ref().map(Vec::len)));
        lengths.push(("usAqi", self.us_aqi.as_ref().map(Vec::len)));

        for (key, len) in lengths {
            match len {
                Some(len) if len != expected => {
                    return Err(AppError::InvalidData(format!(
                        "hourly.{} has {} entries but hourly.time has {}",
                        key, len, expected
                    )));
                },
                _ => {},
            }
        }

        if let Some(pos) = self.time.windows(2).position(|w| w[0] > w[1]) {
            return Err(AppError::InvalidData(format!(
                "hourly.time is not ordered: {} is followed by {}",
                self.time[pos],
                self.time[pos + 1]
            )));
        }

        debug!("Validated hourly series with {} hours", expected);
        Ok(())
    }
}

/// Response structure for the Open-Meteo `/air-quality` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, alias = "generationtime_ms")]
    pub generationtime_ms: Option<f64>,
    #[serde(alias = "utc_offset_seconds")]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub timezone: String,
    #[serde(default, alias = "timezone_abbreviation")]
    pub timezone_abbreviation: Option<String>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default, alias = "hourly_units")]
    pub hourly_units: BTreeMap<String, String>,
    pub hourly: HourlyPollutantSeries,
}

impl AirQualityResponse {
    /// Parses and validates a response body or saved snapshot.
    ///
    /// # Errors
    ///
    /// `AppError::JsonParse` for malformed JSON, `AppError::InvalidData` for a series that
    /// violates the hourly invariants.
    pub fn from_json(json: &str) -> Result<Self> {
        let response: AirQualityResponse = serde_json::from_str(json)?;
        response.hourly.validate()?;
        Ok(response)
    }

    /// Calculates the NAQI for this response as of now.
    pub fn calculate_naqi(&self) -> Result<NaqiResult> {
        Ok(calculate_naqi_now(&self.hourly, self.utc_offset_seconds)?)
    }

    /// Calculates the NAQI for this response as of `now`.
    pub fn calculate_naqi_at(&self, now: DateTime<Utc>) -> Result<NaqiResult> {
        Ok(calculate_naqi(&self.hourly, self.utc_offset_seconds, now)?)
    }
}

/// Response structure for the Open-Meteo geocoding `/search` endpoint.
///
/// `results` is omitted entirely by the API when nothing matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<GeoLocation>,
}

/// A single geocoding match.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoLocation {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
    pub timezone: Option<String>,
}

impl GeoLocation {
    /// "Name, Region, Country" with absent parts left out.
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}
