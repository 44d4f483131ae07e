//! Provides clients and utilities for obtaining hourly air-quality data.
//!
//! Includes:
//! - `open_meteo`: Client for the Open-Meteo air-quality and geocoding APIs.
//! - `mock`: Synthetic data provider for demos and offline fallback.

mod mock;
mod open_meteo;
mod open_meteo_test;

pub use mock::*;
pub use open_meteo::*;
