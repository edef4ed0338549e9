//! Tests for the radius pre-filter box and the shared point types.

use forecast_common::{haversine_km, BoundingBox, NamedPlace, QueryPoint};

// ============================================================================
// BoundingBox tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(88.7, 26.7, 92.1, 28.3);
    assert_eq!(bbox.min_lon, 88.7);
    assert_eq!(bbox.min_lat, 26.7);
    assert_eq!(bbox.max_lon, 92.1);
    assert_eq!(bbox.max_lat, 28.3);
}

#[test]
fn test_bbox_clone() {
    let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let bbox2 = bbox1;
    assert_eq!(bbox1, bbox2);
}

#[test]
fn test_bbox_intersects() {
    let bhutan = BoundingBox::new(88.7, 26.7, 92.1, 28.3);
    let thimphu = BoundingBox::around(89.64, 27.47, 0.1, 0.1);
    let delhi = BoundingBox::around(77.2, 28.6, 0.1, 0.1);

    assert!(bhutan.intersects(&thimphu));
    assert!(!bhutan.intersects(&delhi));
}

#[test]
fn test_bbox_zero_span_contains_only_center() {
    let bbox = BoundingBox::around(89.64, 27.47, 0.0, 0.0);
    assert!(!bbox.is_empty());
    assert!(bbox.contains(89.64, 27.47));
    assert!(!bbox.contains(89.641, 27.47));
}

// ============================================================================
// Point tests
// ============================================================================

#[test]
fn test_named_place_to_point() {
    let place = NamedPlace::new("Changzamtog", 27.458, 89.637);
    let point: QueryPoint = (&place).into();
    assert_eq!(point, QueryPoint::new(27.458, 89.637));
}

#[test]
fn test_point_finiteness() {
    assert!(QueryPoint::new(27.4, 89.6).is_finite());
    assert!(!QueryPoint::new(f64::NAN, 89.6).is_finite());
    assert!(!QueryPoint::new(27.4, f64::INFINITY).is_finite());
}

#[test]
fn test_box_corner_lies_beyond_radius() {
    // The corner of a radius-sized box is sqrt(2) times further than the edge.
    let center = QueryPoint::new(27.47, 89.64);
    let lat_span = 10.0 / 111.0;
    let lon_span = 10.0 / (111.0 * center.latitude.to_radians().cos());
    let corner = QueryPoint::new(center.latitude + lat_span, center.longitude + lon_span);
    assert!(haversine_km(center, corner) > 10.0);
}
