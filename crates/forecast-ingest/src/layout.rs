//! Column layout of a forecast table.
//!
//! The table has three required columns (`latitude`, `longitude`, `param`),
//! an optional `forecast_date`, and one column per forecast hour offset.
//! Columns that do not look like hour offsets (such as a blank index column
//! written by a dataframe export) are ignored.

use std::collections::HashSet;

use csv::StringRecord;
use forecast_common::parse_hour_offset;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Positions of the known columns in a header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub latitude: usize,
    pub longitude: usize,
    pub param: usize,
    pub forecast_date: Option<usize>,
    /// (column position, column name, hour offset), in header order.
    pub offsets: Vec<(usize, String, u32)>,
}

impl TableLayout {
    /// Classify the header row.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut latitude = None;
        let mut longitude = None;
        let mut param = None;
        let mut forecast_date = None;
        let mut offsets = Vec::new();
        let mut seen = HashSet::new();

        for (pos, raw) in headers.iter().enumerate() {
            let name = raw.trim();
            match name.to_ascii_lowercase().as_str() {
                "latitude" => latitude = Some(pos),
                "longitude" => longitude = Some(pos),
                "param" => param = Some(pos),
                "forecast_date" => forecast_date = Some(pos),
                _ if !looks_like_hour_column(name) => {
                    debug!(column = %name, position = pos, "Ignoring non-forecast column");
                }
                _ => {
                    let hour = parse_hour_offset(name)
                        .map_err(|_| IngestError::InvalidHourColumn(name.to_string()))?;
                    if !seen.insert(hour) {
                        return Err(IngestError::DuplicateHourColumn(hour));
                    }
                    offsets.push((pos, name.to_string(), hour));
                }
            }
        }

        Ok(Self {
            latitude: latitude.ok_or(IngestError::MissingColumn("latitude"))?,
            longitude: longitude.ok_or(IngestError::MissingColumn("longitude"))?,
            param: param.ok_or(IngestError::MissingColumn("param"))?,
            forecast_date,
            offsets,
        })
    }

    /// Hour offsets in header order.
    pub fn hour_offsets(&self) -> Vec<u32> {
        self.offsets.iter().map(|(_, _, hour)| *hour).collect()
    }
}

/// Numeric-looking names with an optional `h` suffix, e.g. `6h`, `06`,
/// `1.5h` or `-3h`. Only these are parsed as offsets.
fn looks_like_hour_column(name: &str) -> bool {
    let stem = name
        .strip_suffix('h')
        .or_else(|| name.strip_suffix('H'))
        .unwrap_or(name);
    stem.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}
