//! Synthetic forecast grids with analytically known values.
//!
//! Bilinear interpolation reproduces any field of the form
//! `a + b·lat + c·lon + d·lat·lon` exactly, so [`bilinear_field`] gives
//! tests an exact expected value at every point inside the grid.

use std::fmt::Write;

/// A regular latitude/longitude grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularGrid {
    pub min_lat: f64,
    pub min_lon: f64,
    pub rows: usize,
    pub cols: usize,
    /// Spacing in degrees on both axes.
    pub step: f64,
}

impl RegularGrid {
    pub const fn new(min_lat: f64, min_lon: f64, rows: usize, cols: usize, step: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            rows,
            cols,
            step,
        }
    }

    /// 0.1° grid over the Bhutan extent.
    pub const fn bhutan_tenth_degree() -> Self {
        Self::new(26.7, 88.7, 18, 36, 0.1)
    }

    /// 0.1° grid around Thimphu.
    pub const fn thimphu() -> Self {
        Self::new(27.2, 89.4, 6, 6, 0.1)
    }

    /// Grid latitudes, ascending, rounded to 4 decimals to avoid drift.
    pub fn latitudes(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|i| round4(self.min_lat + i as f64 * self.step))
            .collect()
    }

    /// Grid longitudes, ascending, rounded to 4 decimals to avoid drift.
    pub fn longitudes(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|j| round4(self.min_lon + j as f64 * self.step))
            .collect()
    }

    /// All (latitude, longitude) nodes, row by row.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let lons = self.longitudes();
        self.latitudes()
            .into_iter()
            .flat_map(|lat| lons.iter().map(move |&lon| (lat, lon)))
            .collect()
    }

    pub fn max_lat(&self) -> f64 {
        round4(self.min_lat + (self.rows.saturating_sub(1)) as f64 * self.step)
    }

    pub fn max_lon(&self) -> f64 {
        round4(self.min_lon + (self.cols.saturating_sub(1)) as f64 * self.step)
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// A field bilinear interpolation reproduces exactly.
pub fn bilinear_field(lat: f64, lon: f64) -> f64 {
    5.0 + 2.0 * (lat - 27.0) - 3.0 * (lon - 89.0) + 4.0 * (lat - 27.0) * (lon - 89.0)
}

/// Node values of `field` at one offset, as (latitude, longitude, value).
pub fn grid_values(grid: &RegularGrid, field: impl Fn(f64, f64) -> f64) -> Vec<(f64, f64, f64)> {
    grid.points()
        .into_iter()
        .map(|(lat, lon)| (lat, lon, field(lat, lon)))
        .collect()
}

/// Render a grid as a dataset table.
///
/// `value(param, lat, lon, offset)` supplies each cell; returning `None`
/// leaves the cell empty.
pub fn forecast_csv(
    grid: &RegularGrid,
    params: &[&str],
    offsets: &[u32],
    forecast_date: &str,
    value: impl Fn(&str, f64, f64, u32) -> Option<f64>,
) -> String {
    let mut out = String::from("latitude,longitude,param,forecast_date");
    for offset in offsets {
        let _ = write!(out, ",{}h", offset);
    }
    out.push('\n');

    for param in params {
        for (lat, lon) in grid.points() {
            let _ = write!(out, "{},{},{},{}", lat, lon, param, forecast_date);
            for &offset in offsets {
                out.push(',');
                if let Some(v) = value(param, lat, lon, offset) {
                    let _ = write!(out, "{}", v);
                }
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid_axes() {
        let grid = RegularGrid::thimphu();
        assert_eq!(grid.latitudes(), vec![27.2, 27.3, 27.4, 27.5, 27.6, 27.7]);
        assert_eq!(grid.longitudes()[5], 89.9);
        assert_eq!(grid.points().len(), grid.len());
        assert_eq!(grid.max_lat(), 27.7);
    }

    #[test]
    fn test_forecast_csv_layout() {
        let grid = RegularGrid::new(27.4, 89.6, 1, 2, 0.1);
        let csv = forecast_csv(&grid, &["precipitation"], &[0, 6], "2025-07-01", |_, _, lon, h| {
            (h == 0).then_some(lon)
        });
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "latitude,longitude,param,forecast_date,0h,6h");
        assert_eq!(lines[1], "27.4,89.6,precipitation,2025-07-01,89.6,");
        assert_eq!(lines.len(), 3);
    }
}
