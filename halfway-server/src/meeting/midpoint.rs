//! Distance-weighted route midpoints.
//!
//! The midpoint is the point that splits the route's travelled distance in
//! two equal halves, not the middle element of the point array. Long routes
//! are sampled unevenly (dense in towns, sparse on highways), so the array
//! middle can sit far from the real halfway mark.

use serde::Serialize;

use crate::domain::{Coordinate, DomainError, Route, RouteKind};
use crate::geo::{haversine_distance_km, interpolate};

/// The halfway point of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Midpoint {
    pub location: Coordinate,
    /// Which route this midpoint lies on.
    pub route: RouteKind,
    /// Measured share of the total route distance before this point. Close to
    /// 0.5, off by at most the interpolation error within one segment.
    pub fraction: f64,
}

/// Running great-circle distance (km) from the first point to each point.
///
/// Same length as `points`, starts at zero and never decreases.
pub fn cumulative_distances(points: &[Coordinate]) -> Vec<f64> {
    let mut table = Vec::with_capacity(points.len());
    let mut total = 0.0;
    let mut prev = points.first().copied();
    for &point in points {
        if let Some(p) = prev {
            total += haversine_distance_km(p, point);
        }
        table.push(total);
        prev = Some(point);
    }
    table
}

/// Halfway point of a route.
pub fn compute_midpoint(route: &Route) -> Result<Midpoint, DomainError> {
    midpoint_along(route.points(), route.kind())
}

/// Halfway point of an arbitrary path of at least two points.
///
/// When a sample sits exactly at half the total distance that sample is
/// returned. Otherwise the result is interpolated between the two samples
/// bracketing the halfway mark. A path of zero length returns its first
/// point with a fraction of 0.5.
pub fn midpoint_along(points: &[Coordinate], kind: RouteKind) -> Result<Midpoint, DomainError> {
    if points.len() < 2 {
        return Err(DomainError::DegenerateRoute(points.len()));
    }

    let cumulative = cumulative_distances(points);
    let total = cumulative[cumulative.len() - 1];
    let half = total / 2.0;

    // First sample at or past the halfway mark. Exists because the last
    // entry equals `total >= half`.
    let end = cumulative
        .partition_point(|&d| d < half)
        .min(points.len() - 1);

    let (location, along) = if cumulative[end] == half {
        (points[end], cumulative[end])
    } else {
        // cumulative[0] == 0 < half, so `end >= 1`
        let start = end - 1;
        let span = cumulative[end] - cumulative[start];
        let ratio = (half - cumulative[start]) / span;
        let location = interpolate(points[start], points[end], ratio);
        (
            location,
            cumulative[start] + haversine_distance_km(points[start], location),
        )
    };

    let fraction = if total > 0.0 { along / total } else { 0.5 };

    Ok(Midpoint {
        location,
        route: kind,
        fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn cumulative_table_shape() {
        let points = [coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 0.0), coord(3.0, 0.0)];
        let table = cumulative_distances(&points);

        assert_eq!(table.len(), 4);
        assert_eq!(table[0], 0.0);
        assert_eq!(table[1], table[2]);
        assert!(table[3] > table[2]);
    }

    #[test]
    fn cumulative_of_empty_is_empty() {
        assert!(cumulative_distances(&[]).is_empty());
    }

    #[test]
    fn two_points_average() {
        let a = coord(40.0, -75.0);
        let b = coord(42.0, -73.0);
        let m = midpoint_along(&[a, b], RouteKind::Main).unwrap();

        assert_eq!(m.location, coord(41.0, -74.0));
        assert_eq!(m.route, RouteKind::Main);
        assert!((m.fraction - 0.5).abs() < 1e-2, "fraction {}", m.fraction);
    }

    #[test]
    fn fraction_is_measured_along_the_route() {
        // Long diagonal leg: the lat/lng average is not the great-circle halfway
        let a = coord(0.0, 0.0);
        let b = coord(60.0, 60.0);
        let m = midpoint_along(&[a, b], RouteKind::Main).unwrap();

        let total = haversine_distance_km(a, b);
        let measured = haversine_distance_km(a, m.location) / total;
        assert!((m.fraction - measured).abs() < 1e-12);
        assert!((m.fraction - 0.5).abs() > 0.01, "fraction {}", m.fraction);
    }

    #[test]
    fn equal_segments_return_middle_sample() {
        let points = [coord(40.0, -75.0), coord(40.1, -75.0), coord(40.2, -75.0)];
        let m = midpoint_along(&points, RouteKind::Alternate).unwrap();

        assert_eq!(m.location, points[1]);
        assert_eq!(m.route, RouteKind::Alternate);
        assert_eq!(m.fraction, 0.5);
    }

    #[test]
    fn unequal_segments_split_distance() {
        // Along a meridian: 1 degree then 3 degrees, so halfway is at 2 degrees
        let points = [coord(0.0, 0.0), coord(1.0, 0.0), coord(4.0, 0.0)];
        let m = midpoint_along(&points, RouteKind::Main).unwrap();

        assert!((m.location.lat() - 2.0).abs() < 1e-9, "got {:?}", m.location);
        assert_eq!(m.location.lng(), 0.0);
    }

    #[test]
    fn not_the_array_middle() {
        // Dense samples near the start, one long leg at the end
        let points = [
            coord(0.0, 0.0),
            coord(0.1, 0.0),
            coord(0.2, 0.0),
            coord(0.3, 0.0),
            coord(10.0, 0.0),
        ];
        let m = midpoint_along(&points, RouteKind::Main).unwrap();

        assert!((m.location.lat() - 5.0).abs() < 1e-9, "got {:?}", m.location);
        assert_ne!(m.location, points[2]);
    }

    #[test]
    fn duplicate_samples_do_not_break_bracketing() {
        let points = [
            coord(0.0, 0.0),
            coord(4.0, 0.0),
            coord(4.0, 0.0),
            coord(10.0, 0.0),
        ];
        let m = midpoint_along(&points, RouteKind::Main).unwrap();
        assert!((m.location.lat() - 5.0).abs() < 1e-9, "got {:?}", m.location);
    }

    #[test]
    fn zero_length_route() {
        let p = coord(51.5, -0.12);
        let m = midpoint_along(&[p, p, p], RouteKind::Main).unwrap();

        assert_eq!(m.location, p);
        assert_eq!(m.fraction, 0.5);
    }

    #[test]
    fn fewer_than_two_points_is_rejected() {
        assert_eq!(
            midpoint_along(&[], RouteKind::Main),
            Err(DomainError::DegenerateRoute(0))
        );
        assert_eq!(
            midpoint_along(&[coord(1.0, 1.0)], RouteKind::Main),
            Err(DomainError::DegenerateRoute(1))
        );
    }

    #[test]
    fn route_midpoint_carries_kind() {
        let route = Route::new(
            RouteKind::Main,
            vec![coord(40.0, -75.0), coord(42.0, -73.0)],
            0.0,
            0.0,
        )
        .unwrap()
        .into_reused_alternate();

        let m = compute_midpoint(&route).unwrap();
        assert_eq!(m.route, RouteKind::Alternate);
    }
}
