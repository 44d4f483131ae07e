//! Provides a client for the Open-Meteo air-quality and geocoding APIs.
//!
//! This module defines the `OpenMeteoClient` struct and its methods for fetching the
//! hourly pollutant series the NAQI is computed from, and for resolving place names to
//! coordinates.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AirQualityResponse, GeoLocation, GeocodingResponse};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error, info};

/// Hourly variables requested from the air-quality endpoint.
const HOURLY_VARIABLES: &str = "pm10,pm2_5,nitrogen_dioxide,sulphur_dioxide,ammonia,carbon_monoxide,ozone,european_aqi,us_aqi";

/// Maximum number of geocoding matches requested.
const GEOCODING_RESULT_COUNT: u8 = 10;

/// An asynchronous client for the Open-Meteo APIs.
pub struct OpenMeteoClient {
    client: Client,
    air_quality_base_url: String,
    geocoding_base_url: String,
}

impl OpenMeteoClient {
    /// Creates a new `OpenMeteoClient` using the base URLs and timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            client,
            air_quality_base_url: config.air_quality_base_url.clone(),
            geocoding_base_url: config.geocoding_base_url.clone(),
        })
    }

    /// Fetches yesterday's and today's hourly pollutant data for a location.
    ///
    /// `timezone=auto` makes the API return local timestamps together with the matching
    /// UTC offset, which is what the NAQI locator expects.
    pub async fn get_air_quality(&self, latitude: f64, longitude: f64) -> Result<AirQualityResponse> {
        info!(
            "Fetching hourly air quality for ({:.4}, {:.4})",
            latitude, longitude
        );

        let url = format!("{}/air-quality", self.air_quality_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("timezone", "auto".to_string()),
                ("past_days", "1".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching air quality for ({}, {}): {}", latitude, longitude, e);
                AppError::from(e)
            })?;

        let body = check_status(response)?.text().await?;
        let parsed = AirQualityResponse::from_json(&body).map_err(|e| {
            error!("Error parsing air quality response: {}", e);
            e
        })?;

        debug!(
            "Received {} hourly entries ({}, UTC offset {}s)",
            parsed.hourly.time.len(),
            parsed.timezone,
            parsed.utc_offset_seconds
        );
        Ok(parsed)
    }

    /// Searches for locations by name.
    ///
    /// An unknown name yields an empty list rather than an error.
    pub async fn search_locations(&self, name: &str) -> Result<Vec<GeoLocation>> {
        info!("Searching locations matching {:?}", name);

        let url = format!("{}/search", self.geocoding_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", name.to_string()),
                ("count", GEOCODING_RESULT_COUNT.to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error searching locations for {:?}: {}", name, e);
                AppError::from(e)
            })?;

        let body = check_status(response)?.text().await?;
        let parsed: GeocodingResponse = serde_json::from_str(&body)?;

        debug!("Found {} locations for {:?}", parsed.results.len(), name);
        Ok(parsed.results)
    }
}

/// Turns an HTTP error status into `AppError::Api`, logging what is known about it.
fn check_status(response: Response) -> Result<Response> {
    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => {
            let status = e.status();
            let url = e.url().map(|u| u.as_str()).unwrap_or("unknown URL");
            error!(
                "API request to {} failed with status {}: {}",
                url,
                status.unwrap_or_default(),
                e
            );
            if status == Some(StatusCode::BAD_REQUEST) {
                error!("Received 400 Bad Request. Check that the coordinates are within range.");
            } else if status == Some(StatusCode::TOO_MANY_REQUESTS) {
                error!("Received 429. The API rate limit has been reached; try again later.");
            }
            Err(AppError::from(e))
        },
    }
}
