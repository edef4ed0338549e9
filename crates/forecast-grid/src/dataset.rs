//! The immutable forecast data context.
//!
//! A [`ForecastDataset`] is built once per load from a flat list of grid
//! samples and is then shared read-only (usually behind an `Arc`). Reloading
//! means building a new dataset; there are no partial updates.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use forecast_common::{ForecastParam, QueryPoint, ValidTime};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// One row of the forecast grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub latitude: f64,
    pub longitude: f64,
    pub param: ForecastParam,
    /// Anchor date the hour offsets are relative to.
    pub forecast_date: DateTime<Utc>,
    /// Value per forecast hour offset. Absent offsets are missing data.
    pub values: BTreeMap<u32, f64>,
}

impl ForecastSample {
    pub fn new(
        latitude: f64,
        longitude: f64,
        param: ForecastParam,
        forecast_date: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            param,
            forecast_date,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for one offset.
    pub fn with_value(mut self, hour_offset: u32, value: f64) -> Self {
        self.values.insert(hour_offset, value);
        self
    }

    /// Value at an offset. NaN counts as missing.
    pub fn value(&self, hour_offset: u32) -> Option<f64> {
        self.values
            .get(&hour_offset)
            .copied()
            .filter(|v| !v.is_nan())
    }

    pub fn point(&self) -> QueryPoint {
        QueryPoint::new(self.latitude, self.longitude)
    }
}

/// Hashable exact-coordinate key. `-0.0` and `0.0` map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CoordKey(u64, u64);

impl CoordKey {
    pub(crate) fn new(latitude: f64, longitude: f64) -> Self {
        Self(canonical(latitude).to_bits(), canonical(longitude).to_bits())
    }
}

fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// A validated, read-only forecast dataset.
#[derive(Debug, Clone)]
pub struct ForecastDataset {
    samples: Vec<ForecastSample>,
    params: Vec<ForecastParam>,
    time_offsets: Vec<u32>,
}

impl ForecastDataset {
    /// Validate and wrap a list of samples.
    ///
    /// Fails if the list is empty, a coordinate is not finite, or two samples
    /// of the same parameter share a coordinate.
    pub fn new(samples: Vec<ForecastSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(GridError::EmptyDataset);
        }

        let mut seen: HashSet<(ForecastParam, CoordKey)> = HashSet::with_capacity(samples.len());
        let mut params = BTreeSet::new();
        let mut offsets = BTreeSet::new();

        for sample in &samples {
            if !sample.point().is_finite() {
                return Err(GridError::InvalidCoordinate {
                    param: sample.param,
                    latitude: sample.latitude,
                    longitude: sample.longitude,
                });
            }

            let key = CoordKey::new(sample.latitude, sample.longitude);
            if !seen.insert((sample.param, key)) {
                return Err(GridError::DuplicateSample {
                    param: sample.param,
                    latitude: sample.latitude,
                    longitude: sample.longitude,
                });
            }

            params.insert(sample.param);
            offsets.extend(sample.values.keys().copied());
        }

        Ok(Self {
            samples,
            params: params.into_iter().collect(),
            time_offsets: offsets.into_iter().collect(),
        })
    }

    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    /// Samples belonging to one parameter, in load order.
    pub fn samples_for(&self, param: ForecastParam) -> impl Iterator<Item = &ForecastSample> {
        self.samples.iter().filter(move |s| s.param == param)
    }

    /// Distinct parameters present, in [`ForecastParam`] order.
    pub fn params(&self) -> &[ForecastParam] {
        &self.params
    }

    pub fn has_param(&self, param: ForecastParam) -> bool {
        self.params.contains(&param)
    }

    /// Distinct hour offsets present in any sample, ascending.
    pub fn time_offsets(&self) -> &[u32] {
        &self.time_offsets
    }

    /// Anchor date of the dataset, taken from the first sample.
    pub fn forecast_date(&self) -> DateTime<Utc> {
        self.samples[0].forecast_date
    }

    pub fn valid_time(&self, hour_offset: u32) -> ValidTime {
        ValidTime::new(self.forecast_date(), hour_offset)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert_eq!(ForecastDataset::new(vec![]).unwrap_err(), GridError::EmptyDataset);
    }

    #[test]
    fn test_duplicate_coordinate_rejected() {
        let samples = vec![
            ForecastSample::new(27.4, 89.6, ForecastParam::Temperature, date()).with_value(0, 1.0),
            ForecastSample::new(27.4, 89.6, ForecastParam::Temperature, date()).with_value(0, 2.0),
        ];
        assert!(matches!(
            ForecastDataset::new(samples),
            Err(GridError::DuplicateSample { .. })
        ));
    }

    #[test]
    fn test_same_coordinate_across_params_allowed() {
        let samples = vec![
            ForecastSample::new(27.4, 89.6, ForecastParam::Temperature, date()).with_value(0, 1.0),
            ForecastSample::new(27.4, 89.6, ForecastParam::Precipitation, date()).with_value(3, 2.0),
        ];
        let dataset = ForecastDataset::new(samples).unwrap();
        assert_eq!(
            dataset.params(),
            &[ForecastParam::Temperature, ForecastParam::Precipitation]
        );
        assert_eq!(dataset.time_offsets(), &[0, 3]);
        assert_eq!(dataset.samples_for(ForecastParam::Precipitation).count(), 1);
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let samples =
            vec![ForecastSample::new(f64::NAN, 89.6, ForecastParam::Temperature, date())];
        assert!(matches!(
            ForecastDataset::new(samples),
            Err(GridError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_nan_value_is_missing() {
        let sample = ForecastSample::new(27.4, 89.6, ForecastParam::Temperature, date())
            .with_value(0, f64::NAN)
            .with_value(3, 4.0);
        assert_eq!(sample.value(0), None);
        assert_eq!(sample.value(3), Some(4.0));
        assert_eq!(sample.value(6), None);
    }

    #[test]
    fn test_valid_time_uses_anchor() {
        let dataset = ForecastDataset::new(vec![ForecastSample::new(
            27.4,
            89.6,
            ForecastParam::Temperature,
            date(),
        )
        .with_value(12, 1.0)])
        .unwrap();
        assert_eq!(
            dataset.valid_time(12).valid_datetime(),
            Some(Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap())
        );
    }
}
