//! Environment-driven configuration.
//!
//! Values are read from the process environment after `.env` has been loaded by `dotenv`.
//! Every setting has a default, so an empty environment yields a working configuration.

use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const DEFAULT_AIR_QUALITY_BASE_URL: &str = "https://air-quality-api.open-meteo.com/v1";
const DEFAULT_GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub air_quality_base_url: String,
    pub geocoding_base_url: String,
    pub http_timeout: Duration,
    /// Use synthetic data when the air-quality API cannot be reached.
    pub demo_fallback: bool,
    pub log_format: LogFormat,
    /// Directory for a daily rolling log file, in addition to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            air_quality_base_url: DEFAULT_AIR_QUALITY_BASE_URL.to_string(),
            geocoding_base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            demo_fallback: false,
            log_format: LogFormat::Pretty,
            log_dir: None,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is set to a value that cannot be parsed.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Reads the configuration from the current process environment.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let http_timeout = match var("NAQI_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("NAQI_HTTP_TIMEOUT_SECS={raw:?}: {e}"))
            })?),
            None => defaults.http_timeout,
        };

        let demo_fallback = match var("NAQI_DEMO_FALLBACK") {
            Some(raw) => parse_bool("NAQI_DEMO_FALLBACK", &raw)?,
            None => defaults.demo_fallback,
        };

        let log_format = match var("NAQI_LOG_FORMAT").as_deref() {
            None | Some("pretty") | Some("text") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "NAQI_LOG_FORMAT={other:?}: expected \"pretty\" or \"json\""
                )))
            },
        };

        let config = Self {
            air_quality_base_url: var("AIR_QUALITY_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.air_quality_base_url),
            geocoding_base_url: var("GEOCODING_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.geocoding_base_url),
            http_timeout,
            demo_fallback,
            log_format,
            log_dir: var("NAQI_LOG_DIR").map(PathBuf::from),
        };

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

/// A non-empty environment variable.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{name}={raw:?}: expected a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "AIR_QUALITY_BASE_URL",
        "GEOCODING_BASE_URL",
        "NAQI_HTTP_TIMEOUT_SECS",
        "NAQI_DEMO_FALLBACK",
        "NAQI_LOG_FORMAT",
        "NAQI_LOG_DIR",
    ];

    fn clear_env() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_environment() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        clear_env();
        env::set_var("AIR_QUALITY_BASE_URL", "http://localhost:8080/v1/");
        env::set_var("NAQI_HTTP_TIMEOUT_SECS", "3");
        env::set_var("NAQI_DEMO_FALLBACK", "yes");
        env::set_var("NAQI_LOG_FORMAT", "json");
        env::set_var("NAQI_LOG_DIR", "/tmp/naqi-logs");

        let config = Config::from_env().unwrap();
        assert_eq!(config.air_quality_base_url, "http://localhost:8080/v1");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert!(config.demo_fallback);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/naqi-logs")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_unparseable_values() {
        clear_env();
        env::set_var("NAQI_HTTP_TIMEOUT_SECS", "soon");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));

        clear_env();
        env::set_var("NAQI_DEMO_FALLBACK", "maybe");
        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));
        clear_env();
    }
}
