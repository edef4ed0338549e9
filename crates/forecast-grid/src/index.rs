//! Per-parameter lookup structures over a forecast dataset.
//!
//! The grid is rectangular per parameter but not necessarily uniform, so
//! neighbours are found by binary search over the sorted distinct axis values
//! rather than by index arithmetic.

use std::collections::HashMap;
use std::sync::Arc;

use forecast_common::{BoundingBox, ForecastParam};
use tracing::debug;

use crate::dataset::{CoordKey, ForecastDataset, ForecastSample};

/// The grid lines enclosing a query point.
///
/// On a grid line the two bounds of that axis are equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub lat_below: f64,
    pub lat_above: f64,
    pub lon_left: f64,
    pub lon_right: f64,
}

#[derive(Debug, Default)]
struct ParamGrid {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    by_coord: HashMap<CoordKey, usize>,
    /// Sample positions ordered by (latitude, longitude).
    by_latitude: Vec<usize>,
}

/// Read-only index over one dataset snapshot.
#[derive(Debug)]
pub struct GridIndex {
    dataset: Arc<ForecastDataset>,
    grids: HashMap<ForecastParam, ParamGrid>,
}

impl GridIndex {
    /// Build the index for every parameter present in the dataset.
    pub fn new(dataset: Arc<ForecastDataset>) -> Self {
        let mut grids: HashMap<ForecastParam, ParamGrid> = HashMap::new();

        for (pos, sample) in dataset.samples().iter().enumerate() {
            let grid = grids.entry(sample.param).or_default();
            grid.latitudes.push(sample.latitude);
            grid.longitudes.push(sample.longitude);
            grid.by_coord
                .insert(CoordKey::new(sample.latitude, sample.longitude), pos);
            grid.by_latitude.push(pos);
        }

        let samples = dataset.samples();
        for (param, grid) in grids.iter_mut() {
            sort_distinct(&mut grid.latitudes);
            sort_distinct(&mut grid.longitudes);
            grid.by_latitude.sort_by(|&a, &b| {
                samples[a]
                    .latitude
                    .total_cmp(&samples[b].latitude)
                    .then(samples[a].longitude.total_cmp(&samples[b].longitude))
            });

            debug!(
                param = %param,
                samples = grid.by_coord.len(),
                rows = grid.latitudes.len(),
                cols = grid.longitudes.len(),
                "Indexed parameter grid"
            );
        }

        Self { dataset, grids }
    }

    pub fn dataset(&self) -> &Arc<ForecastDataset> {
        &self.dataset
    }

    pub fn has_param(&self, param: ForecastParam) -> bool {
        self.grids.contains_key(&param)
    }

    /// Sorted distinct latitudes for a parameter; empty if absent.
    pub fn unique_latitudes(&self, param: ForecastParam) -> &[f64] {
        self.grids
            .get(&param)
            .map(|g| g.latitudes.as_slice())
            .unwrap_or(&[])
    }

    /// Sorted distinct longitudes for a parameter; empty if absent.
    pub fn unique_longitudes(&self, param: ForecastParam) -> &[f64] {
        self.grids
            .get(&param)
            .map(|g| g.longitudes.as_slice())
            .unwrap_or(&[])
    }

    /// The sample stored at exactly `(latitude, longitude)`.
    pub fn sample_at(
        &self,
        param: ForecastParam,
        latitude: f64,
        longitude: f64,
    ) -> Option<&ForecastSample> {
        let grid = self.grids.get(&param)?;
        let pos = grid.by_coord.get(&CoordKey::new(latitude, longitude))?;
        self.dataset.samples().get(*pos)
    }

    /// Value at an exact coordinate and hour offset.
    pub fn value_at(
        &self,
        param: ForecastParam,
        latitude: f64,
        longitude: f64,
        hour_offset: u32,
    ) -> Option<f64> {
        self.sample_at(param, latitude, longitude)?
            .value(hour_offset)
    }

    /// Find the grid lines enclosing a point.
    ///
    /// Returns `None` when the point is outside the parameter's coordinate
    /// range on either axis (or the parameter is absent).
    pub fn bracket(&self, param: ForecastParam, latitude: f64, longitude: f64) -> Option<CellBounds> {
        let grid = self.grids.get(&param)?;

        Some(CellBounds {
            lat_below: floor_value(&grid.latitudes, latitude)?,
            lat_above: ceil_value(&grid.latitudes, latitude)?,
            lon_left: floor_value(&grid.longitudes, longitude)?,
            lon_right: ceil_value(&grid.longitudes, longitude)?,
        })
    }

    /// Samples whose coordinates fall inside `bbox` (edges inclusive).
    ///
    /// Latitude is narrowed by binary search; longitude is filtered linearly
    /// within that band.
    pub fn samples_in_box(
        &self,
        param: ForecastParam,
        bbox: &BoundingBox,
    ) -> impl Iterator<Item = &ForecastSample> + '_ {
        let samples = self.dataset.samples();
        let band: &[usize] = match self.grids.get(&param) {
            Some(grid) if !bbox.is_empty() => {
                let order = &grid.by_latitude;
                let start = order.partition_point(|&i| samples[i].latitude < bbox.min_lat);
                let end = order.partition_point(|&i| samples[i].latitude <= bbox.max_lat);
                &order[start..end.max(start)]
            }
            _ => &[],
        };

        let (min_lon, max_lon) = (bbox.min_lon, bbox.max_lon);
        band.iter()
            .map(move |&i| &samples[i])
            .filter(move |s| s.longitude >= min_lon && s.longitude <= max_lon)
    }
}

fn sort_distinct(values: &mut Vec<f64>) {
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a == b);
}

/// Greatest value `<= target`.
fn floor_value(sorted: &[f64], target: f64) -> Option<f64> {
    let idx = sorted.partition_point(|v| *v <= target);
    idx.checked_sub(1).map(|i| sorted[i])
}

/// Smallest value `>= target`.
fn ceil_value(sorted: &[f64], target: f64) -> Option<f64> {
    if target.is_nan() {
        return None;
    }
    let idx = sorted.partition_point(|v| *v < target);
    sorted.get(idx).copied()
}
