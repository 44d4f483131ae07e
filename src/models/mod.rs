//! Defines the data structures and models used throughout the application.
//!
//! This covers the hourly air-quality data fetched from Open-Meteo (or loaded from a
//! saved snapshot) and the geocoding results used to pick a location.

mod air_quality;

pub use air_quality::*;
