//! Common types and utilities shared across the forecast grid crates.

pub mod bbox;
pub mod error;
pub mod geo;
pub mod param;
pub mod point;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{ParseError, ParseResult};
pub use geo::{haversine_km, EARTH_RADIUS_KM};
pub use param::ForecastParam;
pub use point::{NamedPlace, QueryPoint};
pub use time::{parse_forecast_date, parse_hour_offset, ValidTime, MAX_HOUR_OFFSET};
