//! Forecast query façade.
//!
//! [`ForecastQuery`] is the entry point for the presentation layer. It owns an
//! index over one immutable dataset and answers batched questions: a time
//! series at a point, radius totals per offset, and a per-place comparison
//! table. It is cheap to clone and safe to share between threads.
//!
//! # Example
//!
//! ```ignore
//! use forecast_grid::{ForecastQuery, GridConfig};
//! use forecast_common::{ForecastParam, QueryPoint};
//!
//! let query = ForecastQuery::new(dataset, GridConfig::default())?;
//! let series = query.interpolate_series(
//!     ForecastParam::Temperature,
//!     QueryPoint::new(27.47, 89.64),
//!     query.dataset().time_offsets(),
//! )?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use forecast_common::{ForecastParam, NamedPlace, QueryPoint};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{Aggregate, RadiusAggregator};
use crate::config::GridConfig;
use crate::dataset::ForecastDataset;
use crate::error::{GridError, Result};
use crate::index::GridIndex;
use crate::interpolation::{Interpolated, Interpolator};

/// One entry of a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<T> {
    pub time_offset: u32,
    /// Anchor date plus `time_offset` hours.
    pub valid_time: DateTime<Utc>,
    pub value: T,
}

/// One row of the place comparison table: a (parameter, offset) pair with
/// one value per place, in the order the places were given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub param: ForecastParam,
    pub time_offset: u32,
    pub valid_time: DateTime<Utc>,
    pub values: Vec<Interpolated>,
}

/// Read-only query surface over one dataset.
#[derive(Debug, Clone)]
pub struct ForecastQuery {
    index: Arc<GridIndex>,
    config: Arc<GridConfig>,
}

impl ForecastQuery {
    /// Index `dataset` and validate `config`.
    pub fn new(dataset: Arc<ForecastDataset>, config: GridConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            index: Arc::new(GridIndex::new(dataset)),
            config: Arc::new(config),
        })
    }

    pub fn dataset(&self) -> &Arc<ForecastDataset> {
        self.index.dataset()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn index(&self) -> &GridIndex {
        &self.index
    }

    pub fn interpolator(&self) -> Interpolator<'_> {
        Interpolator::new(&self.index, &self.config)
    }

    pub fn aggregator(&self) -> RadiusAggregator<'_> {
        RadiusAggregator::new(&self.index, &self.config)
    }

    /// Sorted distinct latitudes of a parameter (diagnostics).
    pub fn unique_latitudes(&self, param: ForecastParam) -> &[f64] {
        self.index.unique_latitudes(param)
    }

    /// Sorted distinct longitudes of a parameter (diagnostics).
    pub fn unique_longitudes(&self, param: ForecastParam) -> &[f64] {
        self.index.unique_longitudes(param)
    }

    fn ensure_param(&self, param: ForecastParam) -> Result<()> {
        if self.index.has_param(param) {
            Ok(())
        } else {
            Err(GridError::InvalidParameter(param))
        }
    }

    /// Anchor date plus `time_offset` hours.
    pub fn valid_datetime(&self, time_offset: u32) -> Result<DateTime<Utc>> {
        self.dataset()
            .valid_time(time_offset)
            .valid_datetime()
            .ok_or(GridError::InvalidTimeOffset(time_offset))
    }

    fn series_point<T>(&self, time_offset: u32, value: T) -> Result<SeriesPoint<T>> {
        Ok(SeriesPoint {
            time_offset,
            valid_time: self.valid_datetime(time_offset)?,
            value,
        })
    }

    /// Interpolate one parameter at one point and offset.
    pub fn interpolate(
        &self,
        param: ForecastParam,
        time_offset: u32,
        point: QueryPoint,
    ) -> Result<Interpolated> {
        self.ensure_param(param)?;
        Ok(self.interpolator().interpolate(param, time_offset, point))
    }

    /// Interpolated values at `point` for each offset, in input order.
    pub fn interpolate_series(
        &self,
        param: ForecastParam,
        point: QueryPoint,
        time_offsets: &[u32],
    ) -> Result<Vec<SeriesPoint<Interpolated>>> {
        self.ensure_param(param)?;
        let interpolator = self.interpolator();

        let series: Vec<_> = time_offsets
            .iter()
            .map(|&offset| self.series_point(offset, interpolator.interpolate(param, offset, point)))
            .collect::<Result<_>>()?;

        debug!(
            param = %param,
            lat = point.latitude,
            lon = point.longitude,
            offsets = series.len(),
            covered = series.iter().filter(|p| p.value.is_covered()).count(),
            "Interpolated series"
        );

        Ok(series)
    }

    /// Radius totals around `point` for each offset, in input order.
    pub fn aggregate_series(
        &self,
        param: ForecastParam,
        point: QueryPoint,
        radius_km: f64,
        time_offsets: &[u32],
    ) -> Result<Vec<SeriesPoint<Aggregate>>> {
        self.ensure_param(param)?;
        let aggregator = self.aggregator();

        let series: Vec<_> = time_offsets
            .iter()
            .map(|&offset| {
                self.series_point(offset, aggregator.aggregate(param, offset, point, radius_km))
            })
            .collect::<Result<_>>()?;

        debug!(
            param = %param,
            lat = point.latitude,
            lon = point.longitude,
            radius_km,
            offsets = series.len(),
            "Aggregated series"
        );

        Ok(series)
    }

    /// Build the comparison table: one row per (param, offset), params outer.
    pub fn compare_places(
        &self,
        params: &[ForecastParam],
        places: &[NamedPlace],
        time_offsets: &[u32],
    ) -> Result<Vec<ComparisonRow>> {
        for &param in params {
            self.ensure_param(param)?;
        }
        let interpolator = self.interpolator();

        let mut rows = Vec::with_capacity(params.len() * time_offsets.len());
        for &param in params {
            for &offset in time_offsets {
                let valid_time = self.valid_datetime(offset)?;
                let values = places
                    .iter()
                    .map(|place| interpolator.interpolate(param, offset, place.point()))
                    .collect();

                rows.push(ComparisonRow {
                    param,
                    time_offset: offset,
                    valid_time,
                    values,
                });
            }
        }

        debug!(
            params = params.len(),
            places = places.len(),
            rows = rows.len(),
            "Built place comparison"
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ForecastSample;
    use chrono::TimeZone;

    fn query() -> ForecastQuery {
        let date = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let corners = [
            (27.40, 89.60, 20.0),
            (27.40, 89.70, 22.0),
            (27.50, 89.60, 18.0),
            (27.50, 89.70, 24.0),
        ];
        let samples = corners
            .iter()
            .map(|&(lat, lon, v)| {
                ForecastSample::new(lat, lon, ForecastParam::Temperature, date)
                    .with_value(0, v)
                    .with_value(3, v + 1.0)
            })
            .collect();
        ForecastQuery::new(
            Arc::new(ForecastDataset::new(samples).unwrap()),
            GridConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_series_preserves_input_order() {
        let query = query();
        let series = query
            .interpolate_series(ForecastParam::Temperature, QueryPoint::new(27.45, 89.65), &[3, 0, 9])
            .unwrap();

        let offsets: Vec<u32> = series.iter().map(|p| p.time_offset).collect();
        assert_eq!(offsets, vec![3, 0, 9]);
        assert!((series[0].value.value().unwrap() - 22.0).abs() < 1e-9);
        assert!((series[1].value.value().unwrap() - 21.0).abs() < 1e-9);
        assert_eq!(series[2].value, Interpolated::NoCoverage);
        assert_eq!(
            series[0].valid_time,
            Utc.with_ymd_and_hms(2025, 7, 1, 3, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_absent_parameter_is_invalid() {
        let query = query();
        let err = query
            .interpolate_series(ForecastParam::Precipitation, QueryPoint::new(27.45, 89.65), &[0])
            .unwrap_err();
        assert_eq!(err, GridError::InvalidParameter(ForecastParam::Precipitation));

        assert!(query
            .aggregate_series(ForecastParam::SurfaceRunoff, QueryPoint::new(27.45, 89.65), 10.0, &[0])
            .is_err());
    }

    #[test]
    fn test_out_of_range_offset_is_an_error() {
        let query = query();
        let point = QueryPoint::new(27.45, 89.65);
        let offsets = [0, 4_000_000_000];
        let expected = GridError::InvalidTimeOffset(4_000_000_000);

        assert_eq!(
            query
                .interpolate_series(ForecastParam::Temperature, point, &offsets)
                .unwrap_err(),
            expected
        );
        assert_eq!(
            query
                .aggregate_series(ForecastParam::Temperature, point, 10.0, &offsets)
                .unwrap_err(),
            expected
        );
        let places = [NamedPlace::new("Inside", 27.45, 89.65)];
        assert_eq!(
            query
                .compare_places(&[ForecastParam::Temperature], &places, &offsets)
                .unwrap_err(),
            expected
        );
        assert!(query.valid_datetime(u32::MAX).is_err());
        assert!(query.valid_datetime(48).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dataset = query().dataset().clone();
        let config = GridConfig {
            km_per_degree: 0.0,
            ..GridConfig::default()
        };
        assert!(matches!(
            ForecastQuery::new(dataset, config),
            Err(GridError::ConfigError(_))
        ));
    }

    #[test]
    fn test_compare_places_layout() {
        let query = query();
        let places = vec![
            NamedPlace::new("Inside", 27.45, 89.65),
            NamedPlace::new("Outside", 28.0, 89.65),
        ];
        let rows = query
            .compare_places(&[ForecastParam::Temperature], &places, &[0, 3])
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time_offset, 3);
        assert_eq!(rows[0].values.len(), 2);
        assert!(rows[0].values[0].is_covered());
        assert_eq!(rows[0].values[1], Interpolated::NoCoverage);
    }

    #[test]
    fn test_query_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForecastQuery>();
    }
}
