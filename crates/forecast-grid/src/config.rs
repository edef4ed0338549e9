//! Tunable thresholds for interpolation and radius aggregation.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Configuration for the forecast grid.
///
/// The defaults reproduce the dashboard's historical behaviour. They are
/// empirical values, not derived ones, so they can be overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell area (deg²) below which interpolation falls back to the corner mean.
    pub degenerate_denominator: f64,

    /// Surface runoff values below this are reported as zero.
    pub runoff_floor: f64,

    /// Kilometres per degree used by the radius pre-filter.
    pub km_per_degree: f64,

    /// Radius used when callers do not specify one.
    pub default_radius_km: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            degenerate_denominator: 1e-4,
            runoff_floor: 0.01,
            km_per_degree: 111.0,
            default_radius_km: 10.0,
        }
    }
}

impl GridConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_f64("GRID_DEGENERATE_DENOMINATOR") {
            config.degenerate_denominator = val;
        }

        if let Some(val) = env_f64("GRID_RUNOFF_FLOOR") {
            config.runoff_floor = val;
        }

        if let Some(val) = env_f64("GRID_KM_PER_DEGREE") {
            config.km_per_degree = val;
        }

        if let Some(val) = env_f64("GRID_DEFAULT_RADIUS_KM") {
            config.default_radius_km = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("degenerate_denominator", self.degenerate_denominator),
            ("runoff_floor", self.runoff_floor),
            ("km_per_degree", self.km_per_degree),
            ("default_radius_km", self.default_radius_km),
        ];

        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(GridError::config_error(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|val| val.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.degenerate_denominator, 1e-4);
        assert_eq!(config.runoff_floor, 0.01);
        assert_eq!(config.km_per_degree, 111.0);
        assert_eq!(config.default_radius_km, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GridConfig::default();
        config.runoff_floor = 0.0;
        assert!(config.validate().is_err());

        config = GridConfig::default();
        config.km_per_degree = f64::NAN;
        assert!(config.validate().is_err());

        config = GridConfig::default();
        config.default_radius_km = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: GridConfig = serde_json::from_str(r#"{"runoff_floor": 0.05}"#).unwrap();
        assert_eq!(config.runoff_floor, 0.05);
        assert_eq!(config.degenerate_denominator, 1e-4);
    }
}
