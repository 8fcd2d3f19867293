//! Coordinate unit utilities
//!
//! Layout coordinates are carried as `f64` database units (nanometers).
//! Handles formatting and parsing for display in nanometers or microns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display units for layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateUnits {
    /// Database units (nm)
    Nanometers,
    /// Microns (um), the usual mask drawing unit
    Microns,
}

impl Default for CoordinateUnits {
    fn default() -> Self {
        Self::Microns
    }
}

impl fmt::Display for CoordinateUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nanometers => write!(f, "Nanometers"),
            Self::Microns => write!(f, "Microns"),
        }
    }
}

impl FromStr for CoordinateUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nanometers" | "nm" => Ok(Self::Nanometers),
            "microns" | "um" | "micron" => Ok(Self::Microns),
            _ => Err(format!("Unknown coordinate units: {}", s)),
        }
    }
}

/// Nanometers per micron.
pub const NM_PER_UM: f64 = 1000.0;

/// Format a length value for display
///
/// * `value_nm` - Value in database units (nm)
/// * `units` - Target display units
pub fn format_length(value_nm: f64, units: CoordinateUnits) -> String {
    match units {
        CoordinateUnits::Nanometers => {
            // Database units are integral
            format!("{:.0}", value_nm)
        }
        CoordinateUnits::Microns => {
            format!("{:.3}", value_nm / NM_PER_UM)
        }
    }
}

/// Parse a length string to database units (nm)
///
/// * `input` - String to parse
/// * `units` - Assumed display units
pub fn parse_length(input: &str, units: CoordinateUnits) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    let value = input.parse::<f64>().map_err(|e| e.to_string())?;
    match units {
        CoordinateUnits::Nanometers => Ok(value),
        CoordinateUnits::Microns => Ok(value * NM_PER_UM),
    }
}

/// Round a coordinate onto the integral database grid
pub fn snap_to_dbu(value_nm: f64) -> f64 {
    value_nm.round()
}

/// Get the unit label for the given units ("nm" or "um")
pub fn get_unit_label(units: CoordinateUnits) -> &'static str {
    match units {
        CoordinateUnits::Nanometers => "nm",
        CoordinateUnits::Microns => "um",
    }
}
