//! Common test fixtures for forecast grid tests.

/// Common extents as (min_lon, min_lat, max_lon, max_lat).
pub mod bbox {
    /// Bhutan national extent
    pub const BHUTAN: (f64, f64, f64, f64) = (88.7, 26.7, 92.2, 28.4);

    /// Thimphu valley
    pub const THIMPHU: (f64, f64, f64, f64) = (89.55, 27.35, 89.75, 27.60);
}

/// Named locations as (name, latitude, longitude).
pub mod places {
    pub const THIMPHU: (&str, f64, f64) = ("Thimphu", 27.4728, 89.6390);
    pub const CHANGZAMTOG: (&str, f64, f64) = ("Changzamtog", 27.4580, 89.6370);
    pub const PARO: (&str, f64, f64) = ("Paro", 27.4305, 89.4133);
    pub const PUNAKHA: (&str, f64, f64) = ("Punakha", 27.5916, 89.8776);
}

/// The reference interpolation cell: four temperature corners at offset 0h
/// whose midpoint (27.45, 89.65) interpolates to exactly 21.0.
pub mod example_cell {
    /// (latitude, longitude, value)
    pub const CORNERS: [(f64, f64, f64); 4] = [
        (27.40, 89.60, 20.0),
        (27.40, 89.70, 22.0),
        (27.50, 89.60, 18.0),
        (27.50, 89.70, 24.0),
    ];

    pub const MIDPOINT: (f64, f64) = (27.45, 89.65);

    pub const MIDPOINT_VALUE: f64 = 21.0;
}

/// Common time values for testing.
pub mod time {
    /// Anchor date used by generated tables
    pub const FORECAST_DATE: &str = "2025-07-01";

    /// Hour offsets of a typical four-snapshot dataset
    pub const OFFSETS: [u32; 4] = [0, 6, 12, 18];
}

/// A small hand-written table in the loader's layout, using the legacy
/// parameter spellings and one missing cell (precipitation at 27.5/89.7, 6h).
pub const SAMPLE_CSV: &str = "\
latitude,longitude,param,forecast_date,0h,6h
27.4,89.6,temperature_celcius,2025-07-01,20.0,21.0
27.4,89.7,temperature_celcius,2025-07-01,22.0,23.0
27.5,89.6,temperature_celcius,2025-07-01,18.0,19.0
27.5,89.7,temperature_celcius,2025-07-01,24.0,25.0
27.4,89.6,precipitation,2025-07-01,1.5,0.0
27.4,89.7,precipitation,2025-07-01,2.5,0.0
27.5,89.6,precipitation,2025-07-01,0.5,0.0
27.5,89.7,precipitation,2025-07-01,1.0,
27.4,89.6,surface_area,2025-07-01,0.004,0.2
27.4,89.7,surface_area,2025-07-01,0.002,0.4
27.5,89.6,surface_area,2025-07-01,0.001,0.6
27.5,89.7,surface_area,2025-07-01,0.003,0.8
";
