//! Interactive prompts used by the menu loop.

use crate::error::Result;
use crate::models::GeoLocation;
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input};
use std::path::PathBuf;

/// Asks for a latitude and longitude, re-prompting until both are in range.
pub fn prompt_coordinates() -> Result<(f64, f64)> {
    let theme = ColorfulTheme::default();
    let latitude = Input::<f64>::with_theme(&theme)
        .with_prompt("Latitude")
        .validate_with(|v: &f64| check_range(*v, 90.0, "Latitude"))
        .interact_text()?;
    let longitude = Input::<f64>::with_theme(&theme)
        .with_prompt("Longitude")
        .validate_with(|v: &f64| check_range(*v, 180.0, "Longitude"))
        .interact_text()?;
    Ok((latitude, longitude))
}

/// Asks for a place name to search for.
pub fn prompt_location_name() -> Result<String> {
    let name = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("City or place name")
        .validate_with(|v: &String| {
            if v.trim().len() >= 2 {
                Ok(())
            } else {
                Err("Enter at least two characters")
            }
        })
        .interact_text()?;
    Ok(name.trim().to_string())
}

/// Lets the user pick one of the geocoding matches. `None` if cancelled.
pub fn select_location(locations: &[GeoLocation]) -> Result<Option<usize>> {
    let items: Vec<String> = locations
        .iter()
        .map(|l| format!("{} ({:.2}, {:.2})", l.display_name(), l.latitude, l.longitude))
        .collect();
    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a location")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(selection)
}

/// Asks for the path of a saved air-quality JSON response.
pub fn prompt_snapshot_path() -> Result<PathBuf> {
    let path = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Path to air-quality JSON snapshot")
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

/// Checks that a coordinate lies within `[-limit, limit]`.
pub fn check_range(value: f64, limit: f64, name: &str) -> std::result::Result<(), String> {
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be between -{limit} and {limit}"))
    }
}
