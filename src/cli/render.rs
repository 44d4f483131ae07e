//! Terminal rendering of NAQI results and breakpoint tables.

use crate::error::Result;
use crate::naqi::{
    breakpoints, european_aqi_category, us_aqi_category, NaqiCategory, NaqiResult, Pollutant,
};
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// Colours text the way the category badge is coloured.
pub fn paint(category: NaqiCategory, text: &str) -> ColoredString {
    match category {
        NaqiCategory::Good => text.green(),
        NaqiCategory::Satisfactory => text.bright_green(),
        NaqiCategory::Moderate => text.yellow(),
        NaqiCategory::Poor => text.truecolor(255, 165, 0),
        NaqiCategory::VeryPoor => text.red(),
        NaqiCategory::Severe | NaqiCategory::BeyondScale => text.bright_red().bold(),
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// Per-pollutant breakdown of the qualified pollutants.
pub fn pollutant_table(result: &NaqiResult) -> Table {
    let mut table = new_table(&[
        "Pollutant",
        "Concentration",
        "Averaging",
        "Valid hours",
        "Sub-index",
        "Category",
    ]);
    for (pollutant, p) in &result.pollutants {
        let name = if *pollutant == result.prominent_bp_key {
            format!("{} *", p.label)
        } else {
            p.label.to_string()
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.2} {}", p.concentration, p.unit)).set_alignment(CellAlignment::Right),
            Cell::new(p.avg_type),
            Cell::new(format!("{}/{}", p.valid_hours, p.total_hours)).set_alignment(CellAlignment::Right),
            Cell::new(p.sub_index).set_alignment(CellAlignment::Right),
            Cell::new(p.category),
        ]);
    }
    table
}

/// Pollutants left out of the index and why.
pub fn skipped_table(result: &NaqiResult) -> Table {
    let mut table = new_table(&["Pollutant", "Reason"]);
    for (pollutant, reason) in result.skipped_pollutants.iter() {
        table.add_row(vec![Cell::new(pollutant.label()), Cell::new(reason)]);
    }
    table
}

/// The breakpoint table of a pollutant, in the unit it is tabulated in.
pub fn breakpoint_table(pollutant: Pollutant) -> Table {
    let config = pollutant.config();
    let concentration_header = format!("Concentration ({})", config.unit);
    let mut table = new_table(&[concentration_header.as_str(), "Index", "Category"]);
    for row in breakpoints(pollutant) {
        table.add_row(vec![
            Cell::new(format!("{} – {}", row.c_lo, row.c_hi)),
            Cell::new(format!("{} – {}", row.i_lo, row.i_hi)),
            Cell::new(NaqiCategory::from_index(row.i_hi)),
        ]);
    }
    table
}

/// Prints a full, human-readable report of a result.
pub fn print_result(result: &NaqiResult, source: &str) {
    let headline = format!("NAQI {} ({})", result.aqi, result.category);
    println!("{}", paint(result.category, &headline).bold());
    println!("Source: {}", source);
    println!(
        "Prominent pollutant: {} | {} of 7 pollutants qualified",
        result.prominent_pollutant.bold(),
        result.valid_pollutant_count
    );
    println!(
        "Window: {} (located {} via {}, {} hours of data)",
        result.period, result.current_time, result.match_strategy, result.total_data_hours
    );

    let european = result
        .european_aqi
        .map(|v| format!("{:.0} ({})", v, european_aqi_category(v)))
        .unwrap_or_else(|| "n/a".to_string());
    let us = result
        .us_aqi
        .map(|v| format!("{:.0} ({})", v, us_aqi_category(v)))
        .unwrap_or_else(|| "n/a".to_string());
    println!("European AQI: {} | US AQI: {}", european, us);

    println!("\n{}", pollutant_table(result));
    if !result.skipped_pollutants.is_empty() {
        println!("\n{}", "Skipped pollutants".dimmed());
        println!("{}", skipped_table(result));
    }
}

/// Prints a result as pretty JSON.
pub fn print_json(result: &NaqiResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_table_lists_every_row() {
        let rendered = breakpoint_table(Pollutant::Co).to_string();
        assert!(rendered.contains("Concentration (mg/m³)"));
        assert!(rendered.contains("1 – 2"));
        assert!(rendered.contains("34 – 46"));
        assert!(rendered.contains("Severe"));
    }

    #[test]
    fn test_paint_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(paint(NaqiCategory::Poor, "NAQI 250").to_string(), "NAQI 250");
    }
}
