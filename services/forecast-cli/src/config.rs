//! CLI configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use forecast_grid::GridConfig;
use forecast_ingest::DatasetSelection;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_OVERPASS_URL: &str = "http://overpass-api.de/api/interpreter";

/// Runtime configuration for the forecast CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory scanned for the newest forecast CSV
    pub data_dir: PathBuf,

    /// Which CSV in `data_dir` is loaded
    pub dataset_selection: DatasetSelection,

    /// Nominatim search endpoint
    pub nominatim_url: String,

    /// Overpass interpreter endpoint
    pub overpass_url: String,

    /// Timeout for each outbound HTTP request (seconds)
    pub http_timeout_secs: u64,

    /// User-Agent sent to the OpenStreetMap services
    pub user_agent: String,

    /// Interpolation and aggregation thresholds
    pub grid: GridConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("csv_files"),
            dataset_selection: DatasetSelection::default(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            http_timeout_secs: 25,
            user_agent: "forecast-app".to_string(),
            grid: GridConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let http_timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be an integer, got '{}'", raw))?,
            Err(_) => defaults.http_timeout_secs,
        };

        let dataset_selection = match env::var("FORECAST_DATASET_SELECTION") {
            Ok(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            Err(_) => defaults.dataset_selection,
        };

        let config = Self {
            data_dir: env::var("FORECAST_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            dataset_selection,
            nominatim_url: env::var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            overpass_url: env::var("OVERPASS_URL").unwrap_or(defaults.overpass_url),
            http_timeout_secs,
            user_agent: env::var("FORECAST_USER_AGENT").unwrap_or(defaults.user_agent),
            grid: GridConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP timeout must be at least one second");
        }
        self.grid.validate().context("Invalid grid configuration")?;
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Shared HTTP client for the lookup services.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout())
            .user_agent(self.user_agent.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("csv_files"));
        assert_eq!(config.http_timeout(), Duration::from_secs(25));
        assert_eq!(config.user_agent, "forecast-app");
        assert_eq!(config.dataset_selection, DatasetSelection::Oldest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CliConfig {
            http_timeout_secs: 0,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let mut config = CliConfig::default();
        config.grid.runoff_floor = -1.0;
        assert!(config.validate().is_err());
    }
}
