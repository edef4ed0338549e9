//! Geographic points supplied by the geocoding and place-lookup collaborators.

use serde::{Deserialize, Serialize};

/// A target location in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl QueryPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A named settlement near the selected location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NamedPlace {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn point(&self) -> QueryPoint {
        QueryPoint::new(self.latitude, self.longitude)
    }
}

impl From<&NamedPlace> for QueryPoint {
    fn from(place: &NamedPlace) -> Self {
        place.point()
    }
}
