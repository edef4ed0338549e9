//! Dashboard report assembly.

use chrono::{DateTime, Utc};
use forecast_common::{ForecastParam, NamedPlace, QueryPoint};
use forecast_grid::{ForecastDataset, ForecastQuery, Interpolated, Result};
use serde::Serialize;

/// Decimal places shown for every reported value.
const DISPLAY_DECIMALS: i32 = 2;

/// Inputs for one report.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Human-readable location name, if it came from geocoding.
    pub location_name: Option<String>,
    pub point: QueryPoint,
    /// Parameter for the main series. Defaults to [`default_param`].
    pub param: Option<ForecastParam>,
    pub radius_km: f64,
    /// Offsets to report. Empty means every offset in the dataset.
    pub time_offsets: Vec<u32>,
    pub places: Vec<NamedPlace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub location: LocationSummary,
    pub forecast_date: DateTime<Utc>,
    pub param: ForecastParam,
    pub param_label: &'static str,
    pub series: Vec<SeriesEntry>,
    /// Absent when the dataset has no precipitation.
    pub precipitation_totals: Option<PrecipitationTotals>,
    /// Absent when no places were found.
    pub nearby_places: Option<PlaceTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub time_offset: u32,
    pub valid_time: DateTime<Utc>,
    /// `None` where the grid does not cover the point.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationTotals {
    pub radius_km: f64,
    pub totals: Vec<TotalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalEntry {
    pub time_offset: u32,
    pub valid_time: DateTime<Utc>,
    /// `None` when no sample with data lies inside the radius.
    pub total_mm: Option<f64>,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceTable {
    pub places: Vec<NamedPlace>,
    pub rows: Vec<PlaceRow>,
}

/// One table row, labelled like "Temperature (°C) – 6h".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRow {
    pub label: String,
    pub param: ForecastParam,
    pub time_offset: u32,
    /// One value per place, in [`PlaceTable::places`] order.
    pub values: Vec<Option<f64>>,
}

/// Temperature when present, else the first parameter in display order.
pub fn default_param(dataset: &ForecastDataset) -> Option<ForecastParam> {
    if dataset.has_param(ForecastParam::Temperature) {
        return Some(ForecastParam::Temperature);
    }
    ForecastParam::ALL.into_iter().find(|p| dataset.has_param(*p))
}

fn display(value: Interpolated) -> Option<f64> {
    value.rounded(DISPLAY_DECIMALS).value()
}

/// Build the report for one location.
pub fn build_report(query: &ForecastQuery, request: &ReportRequest) -> Result<ForecastReport> {
    let dataset = query.dataset();
    let param = match request.param {
        Some(param) => param,
        // A validated dataset has at least one parameter.
        None => default_param(dataset).unwrap_or(ForecastParam::Temperature),
    };

    let offsets: Vec<u32> = if request.time_offsets.is_empty() {
        dataset.time_offsets().to_vec()
    } else {
        request.time_offsets.clone()
    };

    let series = query
        .interpolate_series(param, request.point, &offsets)?
        .into_iter()
        .map(|p| SeriesEntry {
            time_offset: p.time_offset,
            valid_time: p.valid_time,
            value: display(p.value),
        })
        .collect();

    let precipitation_totals = if dataset.has_param(ForecastParam::Precipitation) {
        let totals = query
            .aggregate_series(
                ForecastParam::Precipitation,
                request.point,
                request.radius_km,
                &offsets,
            )?
            .into_iter()
            .map(|p| TotalEntry {
                time_offset: p.time_offset,
                valid_time: p.valid_time,
                total_mm: p.value.rounded(DISPLAY_DECIMALS).value(),
                samples: p.value.sample_count(),
            })
            .collect();

        Some(PrecipitationTotals {
            radius_km: request.radius_km,
            totals,
        })
    } else {
        None
    };

    let nearby_places = if request.places.is_empty() {
        None
    } else {
        let params: Vec<ForecastParam> = ForecastParam::ALL
            .into_iter()
            .filter(|p| dataset.has_param(*p))
            .collect();

        let rows = query
            .compare_places(&params, &request.places, &offsets)?
            .into_iter()
            .map(|row| PlaceRow {
                label: format!("{} – {}h", row.param.label(), row.time_offset),
                param: row.param,
                time_offset: row.time_offset,
                values: row.values.into_iter().map(display).collect(),
            })
            .collect();

        Some(PlaceTable {
            places: request.places.clone(),
            rows,
        })
    };

    Ok(ForecastReport {
        location: LocationSummary {
            name: request.location_name.clone(),
            latitude: request.point.latitude,
            longitude: request.point.longitude,
        },
        forecast_date: dataset.forecast_date(),
        param,
        param_label: param.label(),
        series,
        precipitation_totals,
        nearby_places,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_and_maps_no_coverage() {
        assert_eq!(display(Interpolated::Value(21.456)), Some(21.46));
        assert_eq!(display(Interpolated::NoCoverage), None);
    }
}
