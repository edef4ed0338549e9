//! Great-circle distance.

use crate::point::QueryPoint;

/// Mean Earth radius in kilometres (WGS84 mean radius).
pub const EARTH_RADIUS_KM: f64 = 6_371.0088;

/// Haversine distance between two points in kilometres.
pub fn haversine_km(a: QueryPoint, b: QueryPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}
