//! Category bands for the NAQI and for the European and US indices passed through
//! alongside it.

use serde::Serialize;
use std::fmt;

/// Health category of an NAQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NaqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
    /// Above 500. Unreachable through the interpolator, which clamps.
    #[serde(rename = "Beyond Scale")]
    BeyondScale,
}

impl NaqiCategory {
    pub fn from_index(aqi: u16) -> Self {
        match aqi {
            0..=50 => NaqiCategory::Good,
            51..=100 => NaqiCategory::Satisfactory,
            101..=200 => NaqiCategory::Moderate,
            201..=300 => NaqiCategory::Poor,
            301..=400 => NaqiCategory::VeryPoor,
            401..=500 => NaqiCategory::Severe,
            _ => NaqiCategory::BeyondScale,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NaqiCategory::Good => "Good",
            NaqiCategory::Satisfactory => "Satisfactory",
            NaqiCategory::Moderate => "Moderate",
            NaqiCategory::Poor => "Poor",
            NaqiCategory::VeryPoor => "Very Poor",
            NaqiCategory::Severe => "Severe",
            NaqiCategory::BeyondScale => "Beyond Scale",
        }
    }

    /// Colour name of the category's badge.
    pub fn color(&self) -> &'static str {
        match self {
            NaqiCategory::Good => "green",
            NaqiCategory::Satisfactory => "lightgreen",
            NaqiCategory::Moderate => "yellow",
            NaqiCategory::Poor => "orange",
            NaqiCategory::VeryPoor => "red",
            NaqiCategory::Severe | NaqiCategory::BeyondScale => "darkred",
        }
    }
}

impl fmt::Display for NaqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a European AQI value (0–20 Good … 100+ Extremely Poor).
pub fn european_aqi_category(aqi: f64) -> &'static str {
    if aqi <= 20.0 {
        "Good"
    } else if aqi <= 40.0 {
        "Fair"
    } else if aqi <= 60.0 {
        "Moderate"
    } else if aqi <= 80.0 {
        "Poor"
    } else if aqi <= 100.0 {
        "Very Poor"
    } else {
        "Extremely Poor"
    }
}

/// Label for a US AQI value (0–50 Good … 301+ Hazardous).
pub fn us_aqi_category(aqi: f64) -> &'static str {
    if aqi <= 50.0 {
        "Good"
    } else if aqi <= 100.0 {
        "Moderate"
    } else if aqi <= 150.0 {
        "Unhealthy (SG)"
    } else if aqi <= 200.0 {
        "Unhealthy"
    } else if aqi <= 300.0 {
        "Very Unhealthy"
    } else {
        "Hazardous"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, NaqiCategory::Good)]
    #[case(50, NaqiCategory::Good)]
    #[case(51, NaqiCategory::Satisfactory)]
    #[case(100, NaqiCategory::Satisfactory)]
    #[case(101, NaqiCategory::Moderate)]
    #[case(200, NaqiCategory::Moderate)]
    #[case(201, NaqiCategory::Poor)]
    #[case(300, NaqiCategory::Poor)]
    #[case(301, NaqiCategory::VeryPoor)]
    #[case(400, NaqiCategory::VeryPoor)]
    #[case(401, NaqiCategory::Severe)]
    #[case(500, NaqiCategory::Severe)]
    #[case(501, NaqiCategory::BeyondScale)]
    fn test_naqi_bands(#[case] aqi: u16, #[case] expected: NaqiCategory) {
        assert_eq!(NaqiCategory::from_index(aqi), expected);
    }

    #[test]
    fn test_labels_serialize_as_display_text() {
        assert_eq!(
            serde_json::to_string(&NaqiCategory::VeryPoor).unwrap(),
            "\"Very Poor\""
        );
        assert_eq!(NaqiCategory::BeyondScale.to_string(), "Beyond Scale");
        assert_eq!(NaqiCategory::BeyondScale.color(), "darkred");
    }

    #[rstest]
    #[case(15.0, "Good")]
    #[case(40.0, "Fair")]
    #[case(55.0, "Moderate")]
    #[case(80.0, "Poor")]
    #[case(95.0, "Very Poor")]
    #[case(120.0, "Extremely Poor")]
    fn test_european_bands(#[case] aqi: f64, #[case] expected: &str) {
        assert_eq!(european_aqi_category(aqi), expected);
    }

    #[rstest]
    #[case(42.0, "Good")]
    #[case(100.0, "Moderate")]
    #[case(150.0, "Unhealthy (SG)")]
    #[case(175.0, "Unhealthy")]
    #[case(300.0, "Very Unhealthy")]
    #[case(301.0, "Hazardous")]
    fn test_us_bands(#[case] aqi: f64, #[case] expected: &str) {
        assert_eq!(us_aqi_category(aqi), expected);
    }
}
