//! Driving routes and their provenance.

use std::fmt;

use serde::Serialize;

use super::Coordinate;
use super::error::DomainError;

/// Which of the two routes between the origins a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Main,
    Alternate,
}

impl RouteKind {
    /// Index of this route in a routing provider's response.
    pub fn provider_index(self) -> usize {
        match self {
            RouteKind::Main => 0,
            RouteKind::Alternate => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Main => "main",
            RouteKind::Alternate => "alternate",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered driving path from origin to destination.
///
/// Always holds at least two points. The first point is the resolved origin
/// and the last the resolved destination, within provider precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    kind: RouteKind,
    points: Vec<Coordinate>,
    /// Provider-reported length in metres.
    distance_m: f64,
    /// Provider-reported travel time in seconds.
    duration_s: f64,
    /// Set when the provider offered no second route and this alternate
    /// carries the main route's geometry.
    reuses_main_geometry: bool,
}

impl Route {
    /// Create a route, rejecting paths with fewer than two points.
    pub fn new(
        kind: RouteKind,
        points: Vec<Coordinate>,
        distance_m: f64,
        duration_s: f64,
    ) -> Result<Self, DomainError> {
        if points.len() < 2 {
            return Err(DomainError::DegenerateRoute(points.len()));
        }
        Ok(Self {
            kind,
            points,
            distance_m,
            duration_s,
            reuses_main_geometry: false,
        })
    }

    /// Re-label this route as the alternate built from the main geometry.
    pub fn into_reused_alternate(mut self) -> Self {
        self.kind = RouteKind::Alternate;
        self.reuses_main_geometry = true;
        self
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn origin(&self) -> Coordinate {
        self.points[0]
    }

    pub fn destination(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn reuses_main_geometry(&self) -> bool {
        self.reuses_main_geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn rejects_short_routes() {
        assert!(matches!(
            Route::new(RouteKind::Main, vec![], 0.0, 0.0),
            Err(DomainError::DegenerateRoute(0))
        ));
        assert!(matches!(
            Route::new(RouteKind::Main, vec![coord(1.0, 1.0)], 0.0, 0.0),
            Err(DomainError::DegenerateRoute(1))
        ));
    }

    #[test]
    fn endpoints() {
        let route = Route::new(
            RouteKind::Main,
            vec![coord(1.0, 1.0), coord(2.0, 2.0), coord(3.0, 3.0)],
            1000.0,
            60.0,
        )
        .unwrap();

        assert_eq!(route.origin(), coord(1.0, 1.0));
        assert_eq!(route.destination(), coord(3.0, 3.0));
        assert_eq!(route.len(), 3);
        assert!(!route.reuses_main_geometry());
    }

    #[test]
    fn reused_alternate_is_marked() {
        let main = Route::new(
            RouteKind::Main,
            vec![coord(1.0, 1.0), coord(2.0, 2.0)],
            1000.0,
            60.0,
        )
        .unwrap();

        let alternate = main.clone().into_reused_alternate();
        assert_eq!(alternate.kind(), RouteKind::Alternate);
        assert!(alternate.reuses_main_geometry());
        assert_eq!(alternate.points(), main.points());
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RouteKind::Alternate).unwrap(),
            serde_json::json!("alternate")
        );
        assert_eq!(RouteKind::Main.to_string(), "main");
        assert_eq!(RouteKind::Main.provider_index(), 0);
        assert_eq!(RouteKind::Alternate.provider_index(), 1);
    }
}
