//! The closed set of pollutants covered by the index and their static configuration.

use serde::Serialize;
use std::fmt;

/// A pollutant that contributes a sub-index to the NAQI.
///
/// Declaration order is significant: it is the health-priority order used to break ties
/// when two pollutants share the maximum sub-index (particulates before gases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Pollutant {
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "pm25")]
    Pm25,
    #[serde(rename = "no2")]
    No2,
    #[serde(rename = "so2")]
    So2,
    #[serde(rename = "nh3")]
    Nh3,
    #[serde(rename = "co")]
    Co,
    #[serde(rename = "o3")]
    O3,
}

/// How a pollutant's 24-hour window is reduced to a single concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AveragingPolicy {
    /// Arithmetic mean over the whole window.
    #[serde(rename = "24-hr average")]
    TwentyFourHour,
    /// Highest mean over any 8 consecutive hours inside the window.
    #[serde(rename = "8-hr max rolling avg")]
    EightHourRollingMax,
}

impl AveragingPolicy {
    pub fn description(&self) -> &'static str {
        match self {
            AveragingPolicy::TwentyFourHour => "24-hr average",
            AveragingPolicy::EightHourRollingMax => "8-hr max rolling avg",
        }
    }
}

impl fmt::Display for AveragingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Static description of a supported pollutant.
#[derive(Debug)]
pub struct PollutantConfig {
    pub pollutant: Pollutant,
    pub label: &'static str,
    /// Unit the breakpoint table is expressed in.
    pub unit: &'static str,
    pub policy: AveragingPolicy,
    /// Converts a raw input value into the breakpoint table's unit.
    pub conversion: Option<fn(f64) -> f64>,
}

impl PollutantConfig {
    /// Applies the unit conversion, if any.
    pub fn convert(&self, value: f64) -> f64 {
        match self.conversion {
            Some(conv) => conv(value),
            None => value,
        }
    }
}

fn micrograms_to_milligrams(value: f64) -> f64 {
    value / 1000.0
}

static CONFIGS: [PollutantConfig; 7] = [
    PollutantConfig {
        pollutant: Pollutant::Pm10,
        label: "PM₁₀",
        unit: "μg/m³",
        policy: AveragingPolicy::TwentyFourHour,
        conversion: None,
    },
    PollutantConfig {
        pollutant: Pollutant::Pm25,
        label: "PM₂.₅",
        unit: "μg/m³",
        policy: AveragingPolicy::TwentyFourHour,
        conversion: None,
    },
    PollutantConfig {
        pollutant: Pollutant::No2,
        label: "NO₂",
        unit: "μg/m³",
        policy: AveragingPolicy::TwentyFourHour,
        conversion: None,
    },
    PollutantConfig {
        pollutant: Pollutant::So2,
        label: "SO₂",
        unit: "μg/m³",
        policy: AveragingPolicy::TwentyFourHour,
        conversion: None,
    },
    PollutantConfig {
        pollutant: Pollutant::Nh3,
        label: "NH₃",
        unit: "μg/m³",
        policy: AveragingPolicy::TwentyFourHour,
        conversion: None,
    },
    // Supplied in μg/m³, tabulated in mg/m³.
    PollutantConfig {
        pollutant: Pollutant::Co,
        label: "CO",
        unit: "mg/m³",
        policy: AveragingPolicy::EightHourRollingMax,
        conversion: Some(micrograms_to_milligrams),
    },
    PollutantConfig {
        pollutant: Pollutant::O3,
        label: "O₃",
        unit: "μg/m³",
        policy: AveragingPolicy::EightHourRollingMax,
        conversion: None,
    },
];

impl Pollutant {
    /// Every supported pollutant, in tie-break order.
    pub const ALL: [Pollutant; 7] = [
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Nh3,
        Pollutant::Co,
        Pollutant::O3,
    ];

    pub fn config(&self) -> &'static PollutantConfig {
        &CONFIGS[*self as usize]
    }

    /// Key of the pollutant's breakpoint table, also used as the result map key.
    pub fn bp_key(&self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm25",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Nh3 => "nh3",
            Pollutant::Co => "co",
            Pollutant::O3 => "o3",
        }
    }

    /// Field name of the pollutant's hourly column in the camelCase input.
    pub fn data_key(&self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm25",
            Pollutant::No2 => "nitrogenDioxide",
            Pollutant::So2 => "sulphurDioxide",
            Pollutant::Nh3 => "ammonia",
            Pollutant::Co => "carbonMonoxide",
            Pollutant::O3 => "ozone",
        }
    }

    pub fn label(&self) -> &'static str {
        self.config().label
    }

    /// PM10 and PM2.5: at least one must qualify for the index to be valid.
    pub fn is_core_indicator(&self) -> bool {
        matches!(self, Pollutant::Pm10 | Pollutant::Pm25)
    }

    /// Parses a breakpoint key or camelCase data key.
    pub fn from_key(key: &str) -> Option<Pollutant> {
        Pollutant::ALL
            .into_iter()
            .find(|p| p.bp_key().eq_ignore_ascii_case(key) || p.data_key() == key)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
