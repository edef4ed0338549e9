//! Bilinear interpolation of gridded forecast values to arbitrary points.

use forecast_common::{ForecastParam, QueryPoint};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::GridConfig;
use crate::index::{CellBounds, GridIndex};

/// Outcome of interpolating one parameter at one point and offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolated {
    Value(f64),
    /// The point or one of its corners lies outside the available grid.
    NoCoverage,
}

impl Interpolated {
    pub fn value(&self) -> Option<f64> {
        match self {
            Interpolated::Value(v) => Some(*v),
            Interpolated::NoCoverage => None,
        }
    }

    pub fn is_covered(&self) -> bool {
        matches!(self, Interpolated::Value(_))
    }

    /// Round a value to `decimals` places for display.
    pub fn rounded(self, decimals: i32) -> Self {
        match self {
            Interpolated::Value(v) => Interpolated::Value(round_to(v, decimals)),
            Interpolated::NoCoverage => Interpolated::NoCoverage,
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// The four grid samples enclosing a query point, at one hour offset.
///
/// `q11` is (lat_below, lon_left), `q21` (lat_below, lon_right),
/// `q12` (lat_above, lon_left) and `q22` (lat_above, lon_right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCell {
    pub bounds: CellBounds,
    pub q11: f64,
    pub q21: f64,
    pub q12: f64,
    pub q22: f64,
}

impl BoundingCell {
    /// Locate the enclosing cell and read its corner values.
    ///
    /// `None` if the point is outside the grid or any corner value is missing.
    pub fn locate(
        index: &GridIndex,
        param: ForecastParam,
        hour_offset: u32,
        point: QueryPoint,
    ) -> Option<Self> {
        let bounds = index.bracket(param, point.latitude, point.longitude)?;
        let corner = |lat: f64, lon: f64| index.value_at(param, lat, lon, hour_offset);

        Some(Self {
            bounds,
            q11: corner(bounds.lat_below, bounds.lon_left)?,
            q21: corner(bounds.lat_below, bounds.lon_right)?,
            q12: corner(bounds.lat_above, bounds.lon_left)?,
            q22: corner(bounds.lat_above, bounds.lon_right)?,
        })
    }

    pub fn corners(&self) -> [f64; 4] {
        [self.q11, self.q21, self.q12, self.q22]
    }

    /// Arithmetic mean of the corners. Exact when all four are equal, which
    /// keeps values at grid nodes unchanged.
    pub fn mean(&self) -> f64 {
        let corners = self.corners();
        if corners.iter().all(|&q| q == self.q11) {
            return self.q11;
        }
        corners.iter().sum::<f64>() / 4.0
    }

    /// Cell area in square degrees.
    pub fn denominator(&self) -> f64 {
        (self.bounds.lon_right - self.bounds.lon_left) * (self.bounds.lat_above - self.bounds.lat_below)
    }

    /// Bilinear weighted sum at `point`.
    ///
    /// Cells smaller than `degenerate_denominator` (points on a grid line or
    /// node) return the corner mean instead of dividing.
    pub fn interpolate(&self, point: QueryPoint, degenerate_denominator: f64) -> f64 {
        let denom = self.denominator();
        if denom.abs() < degenerate_denominator {
            return self.mean();
        }

        let (x, y) = (point.longitude, point.latitude);
        let CellBounds {
            lat_below: y1,
            lat_above: y2,
            lon_left: x1,
            lon_right: x2,
        } = self.bounds;

        (self.q11 * (x2 - x) * (y2 - y)
            + self.q21 * (x - x1) * (y2 - y)
            + self.q12 * (x2 - x) * (y - y1)
            + self.q22 * (x - x1) * (y - y1))
            / denom
    }
}

/// Interpolates parameters over a [`GridIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    index: &'a GridIndex,
    config: &'a GridConfig,
}

impl<'a> Interpolator<'a> {
    pub fn new(index: &'a GridIndex, config: &'a GridConfig) -> Self {
        Self { index, config }
    }

    /// Interpolate `param` at `point` for one hour offset.
    pub fn interpolate(
        &self,
        param: ForecastParam,
        hour_offset: u32,
        point: QueryPoint,
    ) -> Interpolated {
        if !point.is_finite() {
            return Interpolated::NoCoverage;
        }

        let Some(cell) = BoundingCell::locate(self.index, param, hour_offset, point) else {
            trace!(
                param = %param,
                hour_offset,
                lat = point.latitude,
                lon = point.longitude,
                "No grid coverage"
            );
            return Interpolated::NoCoverage;
        };

        let mut value = cell.interpolate(point, self.config.degenerate_denominator);
        if param == ForecastParam::SurfaceRunoff {
            value = clamp_runoff(value, self.config.runoff_floor);
        }

        Interpolated::Value(value)
    }
}

/// Runoff below the floor (or undefined) is noise and reported as zero.
fn clamp_runoff(value: f64, floor: f64) -> f64 {
    if !value.is_finite() || value < floor {
        0.0
    } else {
        value
    }
}
