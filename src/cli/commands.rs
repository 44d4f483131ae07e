use crate::api::{MockDataProvider, OpenMeteoClient};
use crate::cli::prompts::check_range;
use crate::cli::render;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AirQualityResponse, GeoLocation};
use crate::naqi::{NaqiResult, Pollutant};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// New Delhi, used when the demo is run without coordinates.
pub const DEFAULT_DEMO_LOCATION: (f64, f64) = (28.6139, 77.2090);

/// CLI tool for computing the National Air Quality Index (NAQI)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run; starts the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Fetch live data for coordinates and calculate the NAQI
    Fetch(CoordinateArgs),

    /// Look up a place by name, then fetch and calculate for the best match
    Search {
        /// Place name, e.g. "Mumbai"
        #[arg(short, long)]
        name: String,
    },

    /// Calculate the NAQI from a saved air-quality JSON response
    File {
        /// Path to the JSON file
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Calculate the NAQI for several saved responses at once
    Batch {
        /// Paths to the JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Calculate the NAQI from synthetic data
    Demo {
        #[command(flatten)]
        location: OptionalCoordinateArgs,

        /// Seed for reproducible data
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show the breakpoint tables
    Breakpoints {
        /// Only show this pollutant (pm10, pm25, no2, so2, nh3, co, o3)
        #[arg(short, long)]
        pollutant: Option<String>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CoordinateArgs {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct OptionalCoordinateArgs {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,
}

/// CLI application
pub struct App {
    config: Config,
    api_client: OpenMeteoClient,
    json_output: bool,
}

impl App {
    /// Create a new CLI application
    pub fn new(config: Config, json_output: bool) -> Result<Self> {
        let api_client = OpenMeteoClient::new(&config)?;
        Ok(Self {
            config,
            api_client,
            json_output,
        })
    }

    /// Run a single command
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Fetch(args) => {
                self.fetch_and_report(args.latitude, args.longitude, None).await?;
            },
            Commands::Search { name } => {
                let locations = self.search(&name).await?;
                let location = locations.first().ok_or_else(|| {
                    AppError::Cli(format!("No locations found matching {:?}", name))
                })?;
                self.report_location(location).await?;
            },
            Commands::File { path } => {
                let response = load_snapshot(&path)?;
                let result = response.calculate_naqi()?;
                self.report(&result, &path.display().to_string())?;
            },
            Commands::Batch { paths } => {
                self.run_batch(&paths)?;
            },
            Commands::Demo { location, seed } => {
                let (default_lat, default_lon) = DEFAULT_DEMO_LOCATION;
                let latitude = location.latitude.unwrap_or(default_lat);
                let longitude = location.longitude.unwrap_or(default_lon);
                validate_coordinates(latitude, longitude)?;

                let provider = match seed {
                    Some(seed) => MockDataProvider::with_seed(seed),
                    None => MockDataProvider::new(),
                };
                let result = synthetic_naqi(&provider, latitude, longitude, Utc::now())?;
                self.report(&result, "synthetic demo data")?;
            },
            Commands::Breakpoints { pollutant } => {
                self.show_breakpoints(pollutant.as_deref())?;
            },
        }

        Ok(())
    }

    /// Search for locations by name
    pub async fn search(&self, name: &str) -> Result<Vec<GeoLocation>> {
        let spinner = spinner(format!("Searching for {}...", name))?;
        let result = self.api_client.search_locations(name).await;
        spinner.finish_and_clear();
        result
    }

    /// Fetch data for a geocoded location and report its NAQI
    pub async fn report_location(&self, location: &GeoLocation) -> Result<()> {
        info!("Selected location {}", location.display_name());
        self.fetch_and_report(
            location.latitude,
            location.longitude,
            Some(location.display_name()),
        )
        .await
    }

    /// Fetch data for coordinates and report its NAQI
    ///
    /// Falls back to synthetic data when the API fails and `NAQI_DEMO_FALLBACK` is set.
    pub async fn fetch_and_report(
        &self,
        latitude: f64,
        longitude: f64,
        label: Option<String>,
    ) -> Result<()> {
        validate_coordinates(latitude, longitude)?;
        let label = label.unwrap_or_else(|| format!("({:.4}, {:.4})", latitude, longitude));

        let spinner = spinner(format!("Fetching air quality for {}...", label))?;
        let fetched = self.api_client.get_air_quality(latitude, longitude).await;
        spinner.finish_and_clear();

        let now = Utc::now();
        let (result, source) = match fetched {
            Ok(response) => (
                response.calculate_naqi_at(now)?,
                format!("Open-Meteo, {}", label),
            ),
            Err(e) if self.config.demo_fallback => {
                warn!("API request failed: {}. Using synthetic data instead.", e);
                let result = synthetic_naqi(&MockDataProvider::new(), latitude, longitude, now)?;
                (result, format!("synthetic data for {} (API unavailable)", label))
            },
            Err(e) => return Err(e),
        };

        self.report(&result, &source)
    }

    /// Evaluate several snapshots in parallel against a single clock reading
    ///
    /// Each file is reported on its own; one bad file does not stop the others.
    /// Fails only if every file failed.
    pub fn run_batch(&self, paths: &[PathBuf]) -> Result<()> {
        let now = Utc::now();
        info!("Evaluating {} snapshot(s) at {}", paths.len(), now);

        let outcomes = evaluate_snapshots(paths, now);
        let failures = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();

        for (path, outcome) in &outcomes {
            match outcome {
                Ok(result) => self.report(result, &path.display().to_string())?,
                Err(e) => {
                    error!("Failed to evaluate {}: {}", path.display(), e);
                    println!("{} {}", path.display().to_string().bold(), "failed:".red());
                    println!("{}", e.to_string().red());
                },
            }
            if !self.json_output {
                println!("\n---\n");
            }
        }

        if !outcomes.is_empty() && failures == outcomes.len() {
            return Err(AppError::Cli(format!(
                "All {} snapshot(s) failed to evaluate",
                failures
            )));
        }
        Ok(())
    }

    /// Print the breakpoint tables of one or all pollutants
    pub fn show_breakpoints(&self, pollutant: Option<&str>) -> Result<()> {
        let selected: Vec<Pollutant> = match pollutant {
            Some(key) => vec![Pollutant::from_key(key).ok_or_else(|| {
                AppError::Cli(format!(
                    "Unknown pollutant {:?}. Must be one of: {}",
                    key,
                    Pollutant::ALL.map(|p| p.bp_key()).join(", ")
                ))
            })?],
            None => Pollutant::ALL.to_vec(),
        };

        for pollutant in selected {
            let cfg = pollutant.config();
            println!("{} ({})", pollutant.label().bold(), cfg.policy);
            println!("{}\n", render::breakpoint_table(pollutant));
        }
        Ok(())
    }

    fn report(&self, result: &NaqiResult, source: &str) -> Result<()> {
        if self.json_output {
            render::print_json(result)
        } else {
            render::print_result(result, source);
            Ok(())
        }
    }
}

/// Reads and validates a saved air-quality response.
pub fn load_snapshot(path: &Path) -> Result<AirQualityResponse> {
    info!("Loading snapshot {}", path.display());
    let body = fs::read_to_string(path)?;
    AirQualityResponse::from_json(&body)
}

/// Generates a synthetic series centred on `now` and evaluates it at that same instant.
pub fn synthetic_naqi(
    provider: &MockDataProvider,
    latitude: f64,
    longitude: f64,
    now: DateTime<Utc>,
) -> Result<NaqiResult> {
    provider
        .get_air_quality(latitude, longitude, now)?
        .calculate_naqi_at(now)
}

/// Loads and evaluates each snapshot on the rayon pool, preserving input order.
pub fn evaluate_snapshots(
    paths: &[PathBuf],
    now: DateTime<Utc>,
) -> Vec<(PathBuf, Result<NaqiResult>)> {
    paths
        .par_iter()
        .map(|path| {
            let outcome = load_snapshot(path).and_then(|response| response.calculate_naqi_at(now));
            (path.clone(), outcome)
        })
        .collect()
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    check_range(latitude, 90.0, "Latitude").map_err(AppError::Cli)?;
    check_range(longitude, 180.0, "Longitude").map_err(AppError::Cli)?;
    Ok(())
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NaqiError;
    use crate::naqi::MatchStrategy;
    use serde_json::json;
    use std::io::Write;

    fn test_app() -> App {
        App::new(Config::default(), true).unwrap()
    }

    // Helper to write a snapshot with the given hourly columns to a temp file
    fn write_snapshot(name: &str, hourly: serde_json::Value) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "naqi-calc-{}-{}.json",
            name,
            std::process::id()
        ));
        let body = json!({
            "latitude": 28.6,
            "longitude": 77.2,
            "utcOffsetSeconds": 0,
            "timezone": "GMT",
            "hourly": hourly,
        });
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.to_string().as_bytes()).unwrap();
        path
    }

    fn hours(count: usize) -> Vec<String> {
        (0..count)
            .map(|h| format!("2025-02-{:02}T{:02}:00", 1 + h / 24, h % 24))
            .collect()
    }

    #[test]
    fn test_parse_fetch_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "naqi-calc",
            "fetch",
            "--latitude",
            "40.71",
            "--longitude",
            "-74.01",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Some(Commands::Fetch(CoordinateArgs {
                latitude: 40.71,
                longitude: -74.01,
            }))
        );
    }

    #[test]
    fn test_parse_without_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["naqi-calc"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.json);
    }

    #[test]
    fn test_batch_requires_paths() {
        assert!(Cli::try_parse_from(["naqi-calc", "batch"]).is_err());
    }

    #[tokio::test]
    async fn test_fetch_rejects_out_of_range_coordinates() {
        let app = test_app();
        let result = app
            .run_command(Commands::Fetch(CoordinateArgs {
                latitude: 95.0,
                longitude: 0.0,
            }))
            .await;
        match result {
            Err(AppError::Cli(msg)) => assert!(msg.contains("Latitude must be between")),
            other => panic!("expected Cli error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_breakpoints_unknown_pollutant() {
        let app = test_app();
        let result = app
            .run_command(Commands::Breakpoints {
                pollutant: Some("benzene".to_string()),
            })
            .await;
        match result {
            Err(AppError::Cli(msg)) => assert!(msg.contains("pm10, pm25, no2, so2, nh3, co, o3")),
            other => panic!("expected Cli error, got {other:?}"),
        }
        assert!(app.show_breakpoints(Some("co")).is_ok());
    }

    #[tokio::test]
    async fn test_demo_with_seed_runs() {
        let app = test_app();
        let result = app
            .run_command(Commands::Demo {
                location: OptionalCoordinateArgs {
                    latitude: None,
                    longitude: None,
                },
                seed: Some(42),
            })
            .await;
        // The engine may legitimately reject random data; anything else is a bug.
        if let Err(e) = result {
            assert!(matches!(e, AppError::Naqi(_)), "unexpected {e:?}");
        }
    }

    #[test]
    fn test_synthetic_naqi_uses_one_instant() {
        use chrono::TimeZone;
        // One second before the hour turns, at UTC+5 for New Delhi's longitude.
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 8, 59, 59).unwrap();
        let (lat, lon) = DEFAULT_DEMO_LOCATION;
        match synthetic_naqi(&MockDataProvider::with_seed(5), lat, lon, now) {
            Ok(result) => {
                assert_eq!(result.current_time, "2025-01-15T13:00");
                assert_eq!(result.match_strategy, MatchStrategy::Exact);
                assert_eq!(result.period.to, "2025-01-15T13:00");
            },
            Err(e) => assert!(
                !matches!(e, AppError::Naqi(NaqiError::InsufficientHistory { .. })),
                "unexpected {e}"
            ),
        }
    }

    #[test]
    fn test_evaluate_snapshots_reports_each_file() {
        let good = write_snapshot(
            "good",
            json!({
                "time": hours(24),
                "pm10": vec![45.0; 24],
                "pm2_5": vec![28.0; 24],
                "ozone": vec![80.0; 24],
            }),
        );
        let short = write_snapshot(
            "short",
            json!({ "time": hours(10), "pm10": vec![45.0; 10] }),
        );
        let missing = std::env::temp_dir().join("naqi-calc-does-not-exist.json");
        // "now" is past the end of both series, so each resolves to its last hour.
        let outcomes = evaluate_snapshots(&[good.clone(), short.clone(), missing], Utc::now());

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].0, good);
        let result = outcomes[0].1.as_ref().unwrap();
        assert_eq!(result.valid_pollutant_count, 3);
        assert_eq!(result.period.to, "2025-02-01T23:00");

        assert!(matches!(
            outcomes[1].1,
            Err(AppError::Naqi(NaqiError::InsufficientHistory { available: 10, .. }))
        ));
        assert!(matches!(outcomes[2].1, Err(AppError::Io(_))));

        fs::remove_file(good).ok();
        fs::remove_file(short).ok();
    }

    #[test]
    fn test_batch_fails_only_when_all_fail() {
        let app = test_app();
        let missing = std::env::temp_dir().join("naqi-calc-also-missing.json");
        match app.run_batch(&[missing]) {
            Err(AppError::Cli(msg)) => assert!(msg.contains("All 1 snapshot(s) failed")),
            other => panic!("expected Cli error, got {other:?}"),
        }
    }
}
