//! National Air Quality Index (NAQI) calculator.
//!
//! The [`naqi`] module is a pure engine turning an hourly pollutant series into a single
//! index value. The remaining modules fetch that series from Open-Meteo, load it from saved
//! snapshots, and present the results on the command line.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod naqi;

pub use error::{AppError, NaqiError, Result};
pub use models::{AirQualityResponse, HourlyPollutantSeries};
pub use naqi::{calculate_naqi, calculate_naqi_now, NaqiResult};
