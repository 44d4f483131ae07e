//! Defines the application's primary error type `AppError`, the engine's fatal
//! failure type `NaqiError`, and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.

use crate::naqi::{Pollutant, SkippedPollutants, TimeRange};
use std::sync::Arc;
use thiserror::Error;

/// Structural failures that abort a single NAQI calculation.
///
/// Per-pollutant problems (sensor dropout, too few samples) are not errors; they end up
/// in [`SkippedPollutants`]. These variants cover the cases where no defensible index can
/// be produced at all, and carry enough detail to be shown to a user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NaqiError {
    /// Fewer than 24 hourly samples exist up to and including the located hour.
    #[error(
        "Insufficient history: need {required} hours, but only {available} hour(s) available before {current_time}. Data range: {data_range}."
    )]
    InsufficientHistory {
        required: usize,
        available: usize,
        current_time: String,
        data_range: TimeRange,
    },

    /// Neither PM10 nor PM2.5 produced a sub-index.
    #[error(
        "NAQI requires at least PM10 or PM2.5, but neither has sufficient valid data.\nValid pollutants: [{}]\nSkipped: {skipped}",
        join_labels(.qualified)
    )]
    MissingCoreIndicator {
        qualified: Vec<Pollutant>,
        skipped: SkippedPollutants,
    },

    /// Fewer pollutants than the standard requires produced a sub-index.
    #[error(
        "NAQI requires ≥{required} valid pollutants, but only {} available: [{}].\nSkipped: {skipped}",
        .qualified.len(),
        join_labels(.qualified)
    )]
    InsufficientPollutantCoverage {
        required: usize,
        qualified: Vec<Pollutant>,
        skipped: SkippedPollutants,
    },
}

fn join_labels(pollutants: &[Pollutant]) -> String {
    pollutants
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// The NAQI engine could not produce an index for the given data.
    #[error("NAQI Error: {0}")]
    Naqi(#[from] NaqiError),

    /// Error originating from the Open-Meteo HTTP client (`reqwest`).
    #[error("API Error: {0}")]
    Api(Arc<reqwest::Error>),

    /// Error during JSON parsing (`serde_json`). Wrapped in Arc as serde_json::Error is not Clone.
    #[error("JSON Parsing Error: {0}")]
    JsonParse(Arc<serde_json::Error>),

    /// Input data parsed but violates the hourly series invariants.
    #[error("Invalid Data: {0}")]
    InvalidData(String),

    /// A configuration value could not be interpreted.
    #[error("Configuration Error: {0}")]
    Config(String),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error specific to CLI logic or argument handling.
    #[error("CLI Error: {0}")]
    Cli(String),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress bar style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// These allow easy conversion from external error types into AppError
// using the `?` operator. Arc is used for non-Clone error types.

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Api(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParse(Arc::new(err))
    }
}
