//! Breakpoint tables and the piecewise-linear sub-index interpolator.
//!
//! Each table maps concentration ranges to index ranges and covers the whole 0–500
//! scale. Rows are contiguous: a row's upper concentration is the next row's lower one.

use super::pollutant::Pollutant;
use serde::Serialize;

/// Highest value on the index scale; concentrations past the last row clamp here.
pub const MAX_SUB_INDEX: u16 = 500;

/// One linear segment of a breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakpointRow {
    pub c_lo: f64,
    pub c_hi: f64,
    pub i_lo: u16,
    pub i_hi: u16,
}

const fn row(c_lo: f64, c_hi: f64, i_lo: u16, i_hi: u16) -> BreakpointRow {
    BreakpointRow {
        c_lo,
        c_hi,
        i_lo,
        i_hi,
    }
}

static PM10: [BreakpointRow; 6] = [
    row(0.0, 50.0, 0, 50),
    row(50.0, 100.0, 50, 100),
    row(100.0, 250.0, 100, 200),
    row(250.0, 350.0, 200, 300),
    row(350.0, 430.0, 300, 400),
    row(430.0, 510.0, 400, 500),
];

static PM25: [BreakpointRow; 6] = [
    row(0.0, 30.0, 0, 50),
    row(30.0, 60.0, 50, 100),
    row(60.0, 90.0, 100, 200),
    row(90.0, 120.0, 200, 300),
    row(120.0, 250.0, 300, 400),
    row(250.0, 380.0, 400, 500),
];

static NO2: [BreakpointRow; 6] = [
    row(0.0, 40.0, 0, 50),
    row(40.0, 80.0, 50, 100),
    row(80.0, 180.0, 100, 200),
    row(180.0, 280.0, 200, 300),
    row(280.0, 400.0, 300, 400),
    row(400.0, 520.0, 400, 500),
];

static SO2: [BreakpointRow; 6] = [
    row(0.0, 40.0, 0, 50),
    row(40.0, 80.0, 50, 100),
    row(80.0, 380.0, 100, 200),
    row(380.0, 800.0, 200, 300),
    row(800.0, 1600.0, 300, 400),
    row(1600.0, 2100.0, 400, 500),
];

static NH3: [BreakpointRow; 6] = [
    row(0.0, 200.0, 0, 50),
    row(200.0, 400.0, 50, 100),
    row(400.0, 800.0, 100, 200),
    row(800.0, 1200.0, 200, 300),
    row(1200.0, 1800.0, 300, 400),
    row(1800.0, 2400.0, 400, 500),
];

// mg/m³
static CO: [BreakpointRow; 6] = [
    row(0.0, 1.0, 0, 50),
    row(1.0, 2.0, 50, 100),
    row(2.0, 10.0, 100, 200),
    row(10.0, 17.0, 200, 300),
    row(17.0, 34.0, 300, 400),
    row(34.0, 46.0, 400, 500),
];

static O3: [BreakpointRow; 6] = [
    row(0.0, 50.0, 0, 50),
    row(50.0, 100.0, 50, 100),
    row(100.0, 168.0, 100, 200),
    row(168.0, 208.0, 200, 300),
    row(208.0, 748.0, 300, 400),
    row(748.0, 948.0, 400, 500),
];

/// Returns the breakpoint table for a pollutant, ordered by concentration.
pub fn breakpoints(pollutant: Pollutant) -> &'static [BreakpointRow] {
    match pollutant {
        Pollutant::Pm10 => &PM10,
        Pollutant::Pm25 => &PM25,
        Pollutant::No2 => &NO2,
        Pollutant::So2 => &SO2,
        Pollutant::Nh3 => &NH3,
        Pollutant::Co => &CO,
        Pollutant::O3 => &O3,
    }
}

/// Calculates the sub-index for a concentration already expressed in the table's unit.
///
/// Uses the standard linear interpolation
/// `Ip = ((IHi - ILo) / (BPHi - BPLo)) * (Cp - BPLo) + ILo`, rounded to the nearest integer.
/// The first matching row wins, so a value sitting exactly on a shared boundary uses the
/// lower row (both rows agree there anyway).
///
/// # Returns
///
/// * `Some(500)` for concentrations beyond the last row.
/// * `None` for negative or non-finite concentrations.
pub fn sub_index(pollutant: Pollutant, concentration: f64) -> Option<u16> {
    if !concentration.is_finite() || concentration < 0.0 {
        return None;
    }

    let table = breakpoints(pollutant);
    for bp in table {
        if concentration >= bp.c_lo && concentration <= bp.c_hi {
            if bp.c_hi == bp.c_lo {
                return Some(bp.i_lo);
            }
            let slope = f64::from(bp.i_hi - bp.i_lo) / (bp.c_hi - bp.c_lo);
            let index = slope * (concentration - bp.c_lo) + f64::from(bp.i_lo);
            return Some(index.round() as u16);
        }
    }

    match table.last() {
        Some(last) if concentration > last.c_hi => Some(MAX_SUB_INDEX),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Pollutant::Pm10, 0.0, 0)]
    #[case(Pollutant::Pm10, 30.0, 30)]
    #[case(Pollutant::Pm10, 175.0, 150)]
    #[case(Pollutant::Pm25, 25.0, 42)]
    #[case(Pollutant::Pm25, 30.0, 50)]
    #[case(Pollutant::Pm25, 60.0, 100)]
    #[case(Pollutant::Pm25, 75.0, 150)]
    #[case(Pollutant::No2, 20.0, 25)]
    #[case(Pollutant::So2, 230.0, 150)]
    #[case(Pollutant::Nh3, 300.0, 75)]
    #[case(Pollutant::Co, 2.0, 100)]
    #[case(Pollutant::Co, 1.5, 75)]
    #[case(Pollutant::O3, 188.0, 250)]
    #[case(Pollutant::O3, 948.0, 500)]
    fn test_sub_index_values(
        #[case] pollutant: Pollutant,
        #[case] concentration: f64,
        #[case] expected: u16,
    ) {
        assert_eq!(sub_index(pollutant, concentration), Some(expected));
    }

    #[test]
    fn test_tables_are_contiguous_and_cover_full_scale() {
        for pollutant in Pollutant::ALL {
            let table = breakpoints(pollutant);
            assert_eq!(table.first().map(|r| (r.c_lo, r.i_lo)), Some((0.0, 0)));
            assert_eq!(table.last().map(|r| r.i_hi), Some(MAX_SUB_INDEX));
            for pair in table.windows(2) {
                assert_eq!(pair[0].c_hi, pair[1].c_lo, "{pollutant} gap in concentration");
                assert_eq!(pair[0].i_hi, pair[1].i_lo, "{pollutant} gap in index");
            }
        }
    }

    #[test]
    fn test_continuous_at_interior_breakpoints() {
        for pollutant in Pollutant::ALL {
            for pair in breakpoints(pollutant).windows(2) {
                let at_boundary = sub_index(pollutant, pair[0].c_hi);
                assert_eq!(at_boundary, Some(pair[1].i_lo));
                // Just past the boundary the upper row must start at the same index.
                let nudged = sub_index(pollutant, pair[1].c_lo + 1e-9);
                assert_eq!(nudged, Some(pair[1].i_lo));
            }
        }
    }

    #[test]
    fn test_clamps_beyond_last_row() {
        for pollutant in Pollutant::ALL {
            let top = breakpoints(pollutant).last().unwrap().c_hi;
            assert_eq!(sub_index(pollutant, top + 0.01), Some(MAX_SUB_INDEX));
            assert_eq!(sub_index(pollutant, top * 10.0), Some(MAX_SUB_INDEX));
        }
    }

    #[test]
    fn test_monotonic_in_concentration() {
        for pollutant in Pollutant::ALL {
            let top = breakpoints(pollutant).last().unwrap().c_hi * 1.2;
            let steps = 2_000;
            let mut previous = 0;
            for step in 0..=steps {
                let c = top * f64::from(step) / f64::from(steps);
                let si = sub_index(pollutant, c).unwrap();
                assert!(si >= previous, "{pollutant}: {si} < {previous} at {c}");
                previous = si;
            }
        }
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert_eq!(sub_index(Pollutant::Pm10, -0.5), None);
        assert_eq!(sub_index(Pollutant::O3, f64::NAN), None);
        assert_eq!(sub_index(Pollutant::Co, f64::INFINITY), None);
    }
}
