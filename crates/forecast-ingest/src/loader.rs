//! CSV forecast table loader.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use forecast_common::{parse_forecast_date, ForecastParam};
use forecast_grid::{ForecastDataset, ForecastSample};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::layout::TableLayout;

/// Parses forecast tables into a [`ForecastDataset`].
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    fallback_date: Option<DateTime<Utc>>,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor date used when the table has no `forecast_date` column.
    ///
    /// Defaults to today at midnight UTC.
    pub fn with_fallback_date(mut self, date: DateTime<Utc>) -> Self {
        self.fallback_date = Some(date);
        self
    }

    /// Load a table from a file.
    pub fn load_path(&self, path: &Path) -> Result<ForecastDataset> {
        debug!(path = %path.display(), "Loading forecast table");
        let file = std::fs::File::open(path)?;
        self.load_reader(file)
    }

    /// Load a table from any reader.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<ForecastDataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let layout = TableLayout::from_headers(reader.headers()?)?;
        let fallback = match layout.forecast_date {
            Some(_) => None,
            None => {
                let date = self.fallback_date.unwrap_or_else(today);
                warn!(
                    fallback = %date,
                    "forecast_date column missing, anchoring offsets at fallback date"
                );
                Some(date)
            }
        };

        let mut samples = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            samples.push(parse_row(&layout, &record, line, fallback)?);
        }

        let dataset = ForecastDataset::new(samples)?;

        info!(
            rows = dataset.len(),
            params = ?dataset.params(),
            offsets = ?dataset.time_offsets(),
            forecast_date = %dataset.forecast_date(),
            "Loaded forecast table"
        );

        Ok(dataset)
    }
}

/// Load a table from a file with the default loader.
pub fn load_csv_path(path: &Path) -> Result<ForecastDataset> {
    CsvLoader::default().load_path(path)
}

/// Load a table from a reader with the default loader.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<ForecastDataset> {
    CsvLoader::default().load_reader(reader)
}

fn today() -> DateTime<Utc> {
    let midnight = Utc::now().date_naive().and_hms_opt(0, 0, 0);
    midnight.map(|ndt| ndt.and_utc()).unwrap_or_else(Utc::now)
}

fn parse_row(
    layout: &TableLayout,
    record: &StringRecord,
    line: u64,
    fallback_date: Option<DateTime<Utc>>,
) -> Result<ForecastSample> {
    let field = |pos: usize| record.get(pos).unwrap_or("");

    let latitude = parse_coordinate(field(layout.latitude), "latitude", line)?;
    let longitude = parse_coordinate(field(layout.longitude), "longitude", line)?;

    let name = field(layout.param);
    let param = ForecastParam::parse(name).map_err(|_| IngestError::UnknownParameter {
        line,
        name: name.to_string(),
    })?;

    let forecast_date = match (layout.forecast_date, fallback_date) {
        (Some(pos), _) => {
            let raw = field(pos);
            parse_forecast_date(raw).map_err(|_| IngestError::InvalidDate {
                line,
                value: raw.to_string(),
            })?
        }
        (None, Some(date)) => date,
        (None, None) => today(),
    };

    let mut sample = ForecastSample::new(latitude, longitude, param, forecast_date);
    for (pos, column, hour) in &layout.offsets {
        if let Some(value) = parse_value(field(*pos), column, line)? {
            sample.values.insert(*hour, value);
        }
    }

    Ok(sample)
}

fn parse_coordinate(raw: &str, column: &'static str, line: u64) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::InvalidCoordinate {
            line,
            column,
            value: raw.to_string(),
        })
}

/// Empty and NaN cells are missing values.
fn parse_value(raw: &str, column: &str, line: u64) -> Result<Option<f64>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| IngestError::InvalidValue {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}
