//! Forecast CLI library.
//!
//! Wires the forecast core to its outside collaborators: Nominatim for
//! geocoding a locality, Overpass for nearby named places, and the report
//! payload printed by the `forecast-cli` binary.

pub mod config;
pub mod error;
pub mod geocode;
pub mod places;
pub mod report;

pub use config::CliConfig;
pub use error::{LookupError, LookupResult};
pub use geocode::{LocationQuery, NominatimClient};
pub use places::{OverpassClient, MAX_PLACES};
pub use report::{build_report, default_param, ForecastReport, ReportRequest};
