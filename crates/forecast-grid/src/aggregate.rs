//! Radius-bounded aggregation of grid samples.
//!
//! Selection runs in two phases: a cheap degree-space bounding box narrows
//! the candidates, then the great-circle distance decides membership. The box
//! alone would admit its corners, which lie up to √2 × radius away.

use forecast_common::{haversine_km, BoundingBox, ForecastParam, QueryPoint, EARTH_RADIUS_KM};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::GridConfig;
use crate::dataset::ForecastSample;
use crate::index::GridIndex;
use crate::interpolation::round_to;

/// Lower bound on cos(latitude) so the longitude span stays finite near the poles.
const MIN_COS_LAT: f64 = 0.01;

/// Longitude bounds covering both the -180..180 and 0..360 conventions.
const FULL_LONGITUDE: (f64, f64) = (-180.0, 360.0);

/// Outcome of a radius aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    /// Sum over `samples` contributing grid points.
    Sum { value: f64, samples: usize },
    /// No grid sample with a value lies within the radius.
    NoData,
}

impl Aggregate {
    pub fn value(&self) -> Option<f64> {
        match self {
            Aggregate::Sum { value, .. } => Some(*value),
            Aggregate::NoData => None,
        }
    }

    pub fn sample_count(&self) -> usize {
        match self {
            Aggregate::Sum { samples, .. } => *samples,
            Aggregate::NoData => 0,
        }
    }

    /// Round the total to `decimals` places for display.
    pub fn rounded(self, decimals: i32) -> Self {
        match self {
            Aggregate::Sum { value, samples } => Aggregate::Sum {
                value: round_to(value, decimals),
                samples,
            },
            Aggregate::NoData => Aggregate::NoData,
        }
    }
}

/// Sums parameter values around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RadiusAggregator<'a> {
    index: &'a GridIndex,
    config: &'a GridConfig,
}

impl<'a> RadiusAggregator<'a> {
    pub fn new(index: &'a GridIndex, config: &'a GridConfig) -> Self {
        Self { index, config }
    }

    /// Degree-space pre-filter box for a radius around `center`.
    ///
    /// Local equirectangular spans, widened to the circle's exact longitude
    /// extent at high latitudes. A circle that reaches a pole gets the whole
    /// longitude range.
    pub fn radius_window(&self, center: QueryPoint, radius_km: f64) -> BoundingBox {
        let km_per_degree = self.config.km_per_degree;
        let cos_lat = center.latitude.to_radians().cos();

        let lat_span = radius_km / km_per_degree;
        let mut lon_span = radius_km / (km_per_degree * cos_lat.max(MIN_COS_LAT));

        if radius_km > 0.0 {
            let ratio = (radius_km / EARTH_RADIUS_KM).sin() / cos_lat;
            if center.latitude.abs() + lat_span >= 90.0 || !(ratio < 1.0) {
                return BoundingBox::new(
                    FULL_LONGITUDE.0,
                    center.latitude - lat_span,
                    FULL_LONGITUDE.1,
                    center.latitude + lat_span,
                );
            }
            lon_span = lon_span.max(ratio.asin().to_degrees());
        }

        BoundingBox::around(center.longitude, center.latitude, lon_span, lat_span)
    }

    /// All samples of `param` within `radius_km` of `center`.
    pub fn samples_within(
        &self,
        param: ForecastParam,
        center: QueryPoint,
        radius_km: f64,
    ) -> Vec<&'a ForecastSample> {
        if !center.is_finite() {
            return Vec::new();
        }

        let window = self.radius_window(center, radius_km);
        let index: &'a GridIndex = self.index;

        index
            .samples_in_box(param, &window)
            .filter(|s| haversine_km(center, s.point()) <= radius_km)
            .collect()
    }

    /// Sum of `param` at `hour_offset` over samples within the radius.
    ///
    /// Samples lacking a value at the offset do not contribute. Returns
    /// [`Aggregate::NoData`] when nothing contributes, never an error.
    pub fn aggregate(
        &self,
        param: ForecastParam,
        hour_offset: u32,
        center: QueryPoint,
        radius_km: f64,
    ) -> Aggregate {
        let values: Vec<f64> = self
            .samples_within(param, center, radius_km)
            .into_iter()
            .filter_map(|s| s.value(hour_offset))
            .collect();

        trace!(
            param = %param,
            hour_offset,
            radius_km,
            selected = values.len(),
            "Radius selection"
        );

        if values.is_empty() {
            return Aggregate::NoData;
        }

        Aggregate::Sum {
            value: values.iter().sum(),
            samples: values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ForecastDataset;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn index(values: &[(f64, f64, f64)]) -> GridIndex {
        let date = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let samples = values
            .iter()
            .map(|&(lat, lon, v)| {
                ForecastSample::new(lat, lon, ForecastParam::Precipitation, date).with_value(0, v)
            })
            .collect();
        GridIndex::new(Arc::new(ForecastDataset::new(samples).unwrap()))
    }

    #[test]
    fn test_rounded() {
        assert_eq!(
            Aggregate::Sum { value: 5.504, samples: 3 }.rounded(2),
            Aggregate::Sum { value: 5.5, samples: 3 }
        );
        assert_eq!(Aggregate::NoData.rounded(2), Aggregate::NoData);
    }

    #[test]
    fn test_radius_window_spans() {
        let index = index(&[(27.0, 90.0, 1.0)]);
        let config = GridConfig::default();
        let window = RadiusAggregator::new(&index, &config)
            .radius_window(QueryPoint::new(0.0, 90.0), 111.0);
        assert!((window.height() - 2.0).abs() < 1e-9);
        assert!((window.width() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_polar_window_is_finite_and_spans_all_longitudes() {
        let index = index(&[(27.0, 90.0, 1.0)]);
        let config = GridConfig::default();
        let aggregator = RadiusAggregator::new(&index, &config);

        for lat in [89.95, 90.0, -90.0] {
            let window = aggregator.radius_window(QueryPoint::new(lat, 10.0), 10.0);
            for bound in [window.min_lon, window.min_lat, window.max_lon, window.max_lat] {
                assert!(bound.is_finite(), "window at {} was {:?}", lat, window);
            }
            assert!(window.min_lon <= -180.0 && window.max_lon >= 180.0);
            assert!(window.contains(10.0, lat));
        }
    }

    #[test]
    fn test_cosine_floor_keeps_span_finite() {
        let index = index(&[(27.0, 90.0, 1.0)]);
        let config = GridConfig::default();
        let aggregator = RadiusAggregator::new(&index, &config);

        // Negative radius skips the exact widening, leaving the floored span.
        let window = aggregator.radius_window(QueryPoint::new(90.0, 0.0), -10.0);
        let expected_half = 10.0 / (111.0 * MIN_COS_LAT);
        assert!((window.min_lon - expected_half).abs() < 1e-9);
        assert!(window.is_empty());
    }

    #[test]
    fn test_aggregate_at_pole() {
        let index = index(&[
            (89.95, 0.0, 1.0),
            (89.95, 120.0, 2.0),
            (89.8, 0.0, 4.0),
        ]);
        let config = GridConfig::default();
        let aggregator = RadiusAggregator::new(&index, &config);

        // Both 89.95 samples are ~5.6 km from the pole; 89.8 is ~22 km away.
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, QueryPoint::new(90.0, 0.0), 10.0),
            Aggregate::Sum { value: 3.0, samples: 2 }
        );
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, QueryPoint::new(-90.0, 0.0), 10.0),
            Aggregate::NoData
        );
    }

    #[test]
    fn test_high_latitude_window_contains_circle() {
        let mut values = Vec::new();
        for i in 0..=30 {
            for j in 0..72 {
                values.push((88.5 + i as f64 * 0.05, -180.0 + j as f64 * 5.0, 1.0));
            }
        }
        let index = index(&values);
        let config = GridConfig::default();
        let aggregator = RadiusAggregator::new(&index, &config);

        for lat in [89.0, 89.5, 89.9, 90.0] {
            for radius in [10.0, 30.0, 80.0] {
                let center = QueryPoint::new(lat, 2.5);
                let expected = values
                    .iter()
                    .filter(|&&(la, lo, _)| haversine_km(center, QueryPoint::new(la, lo)) <= radius)
                    .count();
                let selected = aggregator
                    .samples_within(ForecastParam::Precipitation, center, radius)
                    .len();
                assert_eq!(selected, expected, "lat {} radius {}", lat, radius);
                assert!(expected > 0);
            }
        }
    }

    #[test]
    fn test_box_corner_excluded_by_distance() {
        let center = QueryPoint::new(27.45, 89.65);
        let config = GridConfig::default();
        let lat_span = 10.0 / 111.0;
        let lon_span = 10.0 / (111.0 * 27.45f64.to_radians().cos());
        let corner = (27.45 + lat_span * 0.95, 89.65 + lon_span * 0.95, 5.0);
        let index = index(&[(27.45, 89.65, 1.0), corner]);

        let aggregator = RadiusAggregator::new(&index, &config);
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, center, 10.0),
            Aggregate::Sum { value: 1.0, samples: 1 }
        );
    }

    #[test]
    fn test_no_data_distinct_from_zero() {
        let index = index(&[(27.45, 89.65, 0.0)]);
        let config = GridConfig::default();
        let aggregator = RadiusAggregator::new(&index, &config);

        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, QueryPoint::new(27.45, 89.65), 5.0),
            Aggregate::Sum { value: 0.0, samples: 1 }
        );
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, QueryPoint::new(26.0, 91.0), 5.0),
            Aggregate::NoData
        );
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 6, QueryPoint::new(27.45, 89.65), 5.0),
            Aggregate::NoData
        );
    }

    #[test]
    fn test_invalid_radius_selects_nothing() {
        let index = index(&[(27.45, 89.65, 2.0)]);
        let config = GridConfig::default();
        let aggregator = RadiusAggregator::new(&index, &config);
        let center = QueryPoint::new(27.45, 89.65);

        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, center, -1.0),
            Aggregate::NoData
        );
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, center, f64::NAN),
            Aggregate::NoData
        );
        assert_eq!(
            aggregator.aggregate(ForecastParam::Precipitation, 0, center, 0.0),
            Aggregate::Sum { value: 2.0, samples: 1 }
        );
    }
}
