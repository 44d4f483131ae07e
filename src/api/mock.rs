//! Provides a mock data provider for generating plausible hourly air-quality series.
//!
//! This backs the `demo` command and serves as a fallback when the real Open-Meteo API
//! cannot be reached (if enabled), and gives tests realistic input without a network.

use crate::error::Result;
use crate::models::{AirQualityResponse, HourlyPollutantSeries};
use crate::naqi::Pollutant;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::debug;

/// Hours generated: yesterday and today, matching `past_days=1&forecast_days=1`.
const SERIES_HOURS: i64 = 48;

/// Probability that a single hourly sample is reported as missing.
const DROPOUT_PROBABILITY: f64 = 0.05;

/// Generates synthetic hourly pollutant data.
///
/// Values follow a diurnal cycle around a typical level for each pollutant, scaled by a
/// random regional factor, with occasional sensor dropout.
pub struct MockDataProvider {
    /// Fixed seed for reproducible output; fresh entropy on every call when `None`.
    seed: Option<u64>,
}

impl MockDataProvider {
    /// Creates a new `MockDataProvider` producing different data on every call.
    pub fn new() -> Self {
        debug!("Creating MockDataProvider");
        Self { seed: None }
    }

    /// Creates a `MockDataProvider` that always produces the same data for the same inputs.
    pub fn with_seed(seed: u64) -> Self {
        debug!("Creating MockDataProvider with seed {}", seed);
        Self { seed: Some(seed) }
    }

    /// Generates a 48-hour series for a location, covering yesterday and today in the
    /// location's approximate local time.
    ///
    /// The UTC offset is estimated from longitude (15° per hour). Ammonia is only produced
    /// for locations inside Europe, mirroring the real API's coverage.
    ///
    /// # Arguments
    ///
    /// * `latitude`, `longitude` - Location the data pretends to come from.
    /// * `now` - Instant the series is centred on.
    pub fn get_air_quality(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) -> Result<AirQualityResponse> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let offset_hours = (longitude / 15.0).round().clamp(-12.0, 14.0) as i32;
        let utc_offset_seconds = offset_hours * 3600;
        let local_now = now.naive_utc() + Duration::seconds(i64::from(utc_offset_seconds));
        let start = (local_now.date() - Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap_or(local_now);

        let time: Vec<String> = (0..SERIES_HOURS)
            .map(|h| (start + Duration::hours(h)).format("%Y-%m-%dT%H:00").to_string())
            .collect();

        // Applies to every pollutant so the whole series is consistently clean or dirty
        let regional_factor = rng.gen_range(0.6..1.8);
        debug!(
            "Generating {} mock hours at ({:.2}, {:.2}) with factor {:.2}",
            SERIES_HOURS, latitude, longitude, regional_factor
        );

        let mut hourly = HourlyPollutantSeries {
            time,
            ..Default::default()
        };
        for pollutant in Pollutant::ALL {
            if pollutant == Pollutant::Nh3 && !is_in_europe(latitude, longitude) {
                continue;
            }
            let column = (0..SERIES_HOURS)
                .map(|h| {
                    self.generate_mock_value(pollutant, h % 24, regional_factor, &mut rng)
                })
                .collect();
            *hourly.column_mut(pollutant) = Some(column);
        }

        let hourly_units: BTreeMap<String, String> = Pollutant::ALL
            .iter()
            .map(|p| (p.data_key().to_string(), "μg/m³".to_string()))
            .chain([("time".to_string(), "iso8601".to_string())])
            .collect();

        Ok(AirQualityResponse {
            latitude,
            longitude,
            generationtime_ms: None,
            utc_offset_seconds,
            timezone: format!("GMT{:+}", offset_hours),
            timezone_abbreviation: None,
            elevation: None,
            hourly_units,
            hourly,
        })
    }

    /// Generates one hourly sample, or `None` for a simulated dropout.
    ///
    /// Uses a typical level per pollutant (all in μg/m³, as the API reports them),
    /// modulated by a daily cycle peaking mid-afternoon and random noise.
    fn generate_mock_value(
        &self,
        pollutant: Pollutant,
        hour_of_day: i64,
        regional_factor: f64,
        rng: &mut impl Rng,
    ) -> Option<f64> {
        if rng.gen_bool(DROPOUT_PROBABILITY) {
            return None;
        }

        let typical = match pollutant {
            Pollutant::Pm10 => 70.0,
            Pollutant::Pm25 => 40.0,
            Pollutant::No2 => 30.0,
            Pollutant::So2 => 12.0,
            Pollutant::Nh3 => 15.0,
            Pollutant::Co => 800.0,
            Pollutant::O3 => 70.0,
        };

        let phase = 2.0 * PI * (hour_of_day as f64 - 9.0) / 24.0;
        let cycle = 1.0 + 0.3 * phase.sin();
        let noise = rng.gen_range(0.85..1.15);
        let value = typical * regional_factor * cycle * noise;

        Some((value * 10.0).round() / 10.0)
    }
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Rough bounding box of the region where ammonia is modelled.
fn is_in_europe(latitude: f64, longitude: f64) -> bool {
    (34.0..=72.0).contains(&latitude) && (-25.0..=45.0).contains(&longitude)
}
