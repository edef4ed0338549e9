//! Forecast parameters carried by the gridded dataset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A forecast quantity stored in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastParam {
    /// Air temperature in degrees Celsius.
    Temperature,
    /// Precipitation in millimetres.
    Precipitation,
    /// Surface runoff.
    SurfaceRunoff,
}

impl ForecastParam {
    /// All parameters, in dashboard display order.
    pub const ALL: [ForecastParam; 3] = [
        ForecastParam::Temperature,
        ForecastParam::Precipitation,
        ForecastParam::SurfaceRunoff,
    ];

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastParam::Temperature => "temperature",
            ForecastParam::Precipitation => "precipitation",
            ForecastParam::SurfaceRunoff => "surface_runoff",
        }
    }

    /// Human readable label with units.
    pub fn label(&self) -> &'static str {
        match self {
            ForecastParam::Temperature => "Temperature (°C)",
            ForecastParam::Precipitation => "Precipitation (mm)",
            ForecastParam::SurfaceRunoff => "Surface Runoff",
        }
    }

    /// Parse a parameter name as it appears in the `param` column.
    ///
    /// Matching is case-insensitive. The legacy dataset spellings
    /// `temperature_celcius` and `surface_area` are accepted.
    pub fn parse(name: &str) -> Result<Self, ParseError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temperature_celcius" | "temperature_celsius" => {
                Ok(ForecastParam::Temperature)
            }
            "precipitation" => Ok(ForecastParam::Precipitation),
            "surface_runoff" | "surface_area" => Ok(ForecastParam::SurfaceRunoff),
            _ => Err(ParseError::UnknownParameter(name.to_string())),
        }
    }
}

impl FromStr for ForecastParam {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ForecastParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
