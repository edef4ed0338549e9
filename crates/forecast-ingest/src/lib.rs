//! Forecast table ingestion.
//!
//! Reads point-forecast tables with one row per (latitude, longitude,
//! parameter) and one column per hour offset:
//!
//! ```text
//! latitude,longitude,param,forecast_date,0h,6h,12h
//! 27.4,89.6,temperature_celcius,2025-07-01,20.0,21.0,19.5
//! ```
//!
//! A `.csv` in a data directory is selected by modification time with
//! [`find_dataset_file`] (oldest by default) and parsed with [`CsvLoader`] into a validated
//! [`forecast_grid::ForecastDataset`].

pub mod discovery;
pub mod error;
pub mod layout;
pub mod loader;

pub use discovery::{
    find_dataset_file, load_dataset, load_dataset_with, DatasetSelection, LoadedDataset,
};
pub use error::{IngestError, Result};
pub use layout::TableLayout;
pub use loader::{load_csv_path, load_csv_reader, CsvLoader};
