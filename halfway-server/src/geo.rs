//! Great-circle and planar helpers over [`Coordinate`]s.
//!
//! Distances use the haversine formula on a spherical Earth, which is
//! accurate enough for the few-hundred-kilometre spans of a meet-up. No
//! ellipsoid correction is applied.

use serde::Serialize;

use crate::domain::{Coordinate, DomainError};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default padding applied by [`bounding_box`], as a fraction of each axis' range.
pub const DEFAULT_BOUNDS_PADDING: f64 = 0.1;

/// Haversine great-circle distance between two coordinates, in kilometres.
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Linear interpolation in lat/lng space.
///
/// Not geodesic-exact, but close for the short segments of a sampled route.
/// `ratio` is clamped to `[0, 1]`, so the result always lies on the segment.
pub fn interpolate(a: Coordinate, b: Coordinate, ratio: f64) -> Coordinate {
    let t = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    Coordinate::clamped(
        a.lat() + (b.lat() - a.lat()) * t,
        a.lng() + (b.lng() - a.lng()) * t,
    )
}

/// Axis-aligned box enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub southwest: Coordinate,
    pub northeast: Coordinate,
}

impl BoundingBox {
    /// Whether `point` lies inside the box (edges included).
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.southwest.lat()..=self.northeast.lat()).contains(&point.lat())
            && (self.southwest.lng()..=self.northeast.lng()).contains(&point.lng())
    }
}

/// Min/max lat and lng over `points`, each axis grown by `padding_fraction`
/// of its range on both sides.
///
/// Corners are clamped to the valid coordinate range.
pub fn bounding_box(
    points: &[Coordinate],
    padding_fraction: f64,
) -> Result<BoundingBox, DomainError> {
    let first = points.first().ok_or(DomainError::EmptyPointSet)?;

    let (mut min_lat, mut max_lat) = (first.lat(), first.lat());
    let (mut min_lng, mut max_lng) = (first.lng(), first.lng());
    for p in &points[1..] {
        min_lat = min_lat.min(p.lat());
        max_lat = max_lat.max(p.lat());
        min_lng = min_lng.min(p.lng());
        max_lng = max_lng.max(p.lng());
    }

    let lat_pad = (max_lat - min_lat) * padding_fraction;
    let lng_pad = (max_lng - min_lng) * padding_fraction;

    Ok(BoundingBox {
        southwest: Coordinate::clamped(min_lat - lat_pad, min_lng - lng_pad),
        northeast: Coordinate::clamped(max_lat + lat_pad, max_lng + lng_pad),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn zero_distance_to_self() {
        let a = coord(51.5074, -0.1278);
        assert_eq!(haversine_distance_km(a, a), 0.0);
    }

    #[test]
    fn new_york_to_los_angeles() {
        let nyc = coord(40.7128, -74.0060);
        let la = coord(34.0522, -118.2437);
        let d = haversine_distance_km(nyc, la);
        assert!((d - 3936.0).abs() / 3936.0 < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_distance_km(coord(0.0, 0.0), coord(1.0, 0.0));
        // 6371 * pi / 180
        assert!((d - 111.194_926_644_558_7).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn interpolate_endpoints_and_middle() {
        let a = coord(40.0, -75.0);
        let b = coord(42.0, -73.0);

        assert_eq!(interpolate(a, b, 0.0), a);
        assert_eq!(interpolate(a, b, 1.0), b);
        assert_eq!(interpolate(a, b, 0.5), coord(41.0, -74.0));
    }

    #[test]
    fn interpolate_clamps_ratio() {
        let a = coord(40.0, -75.0);
        let b = coord(42.0, -73.0);

        assert_eq!(interpolate(a, b, -0.5), a);
        assert_eq!(interpolate(a, b, 1.5), b);
        assert_eq!(interpolate(a, b, f64::NAN), a);
    }

    #[test]
    fn bounding_box_pads_by_range() {
        let points = [coord(40.0, -75.0), coord(42.0, -74.0), coord(41.0, -73.0)];
        let bounds = bounding_box(&points, 0.1).unwrap();

        assert!((bounds.southwest.lat() - 39.8).abs() < 1e-9);
        assert!((bounds.southwest.lng() - -75.2).abs() < 1e-9);
        assert!((bounds.northeast.lat() - 42.2).abs() < 1e-9);
        assert!((bounds.northeast.lng() - -72.8).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_of_single_point_is_degenerate() {
        let p = coord(10.0, 20.0);
        let bounds = bounding_box(&[p], DEFAULT_BOUNDS_PADDING).unwrap();
        assert_eq!(bounds.southwest, p);
        assert_eq!(bounds.northeast, p);
    }

    #[test]
    fn bounding_box_clamps_to_valid_range() {
        let points = [coord(-90.0, -180.0), coord(90.0, 180.0)];
        let bounds = bounding_box(&points, 0.5).unwrap();
        assert_eq!(bounds.southwest, coord(-90.0, -180.0));
        assert_eq!(bounds.northeast, coord(90.0, 180.0));
    }

    #[test]
    fn bounding_box_rejects_empty() {
        assert_eq!(
            bounding_box(&[], DEFAULT_BOUNDS_PADDING),
            Err(DomainError::EmptyPointSet)
        );
    }
}
