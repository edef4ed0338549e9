//! Spatial interpolation and aggregation over gridded point forecasts.
//!
//! The input is a rectangular (not necessarily uniform) latitude/longitude
//! grid per parameter, with one value per forecast hour offset. This crate
//! answers two questions about it:
//!
//! - **What is parameter P at hour T at an arbitrary point?** Bilinear
//!   interpolation over the four enclosing grid samples.
//! - **What is the total of P at hour T within R km of a point?** A degree
//!   box pre-filter followed by an exact great-circle distance test.
//!
//! # Architecture
//!
//! ```text
//! Vec<ForecastSample>
//!      │
//!      ▼
//! ForecastDataset (validated, immutable, Arc-shared)
//!      │
//!      ▼
//! GridIndex (sorted axes, exact-coordinate lookup, latitude-ordered samples)
//!      │
//!      ├─► Interpolator ──► Interpolated::{Value, NoCoverage}
//!      │
//!      └─► RadiusAggregator ──► Aggregate::{Sum, NoData}
//!               │
//!               ▼
//!          ForecastQuery (series, place comparison)
//! ```

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod interpolation;
pub mod query;

// Re-export commonly used types at crate root
pub use aggregate::{Aggregate, RadiusAggregator};
pub use config::GridConfig;
pub use dataset::{ForecastDataset, ForecastSample};
pub use error::{GridError, Result};
pub use index::{CellBounds, GridIndex};
pub use interpolation::{round_to, BoundingCell, Interpolated, Interpolator};
pub use query::{ComparisonRow, ForecastQuery, SeriesPoint};
