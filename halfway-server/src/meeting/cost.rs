//! Rough driving cost of a route.

use serde::Serialize;

use crate::domain::Route;

use super::midpoint::cumulative_distances;

pub const MILES_PER_KM: f64 = 0.621371;

/// Assumed average fuel economy, in miles per US gallon.
pub const ASSUMED_MPG: f64 = 25.0;

/// Markup over fuel for tolls and wear.
pub const OVERHEAD_FACTOR: f64 = 1.1;

/// Distance and cost estimate, each figure rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteCost {
    pub distance_km: f64,
    pub distance_miles: f64,
    pub fuel_cost: f64,
    pub total_cost: f64,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

impl RouteCost {
    /// Cost of driving `km` kilometres at `fuel_price_per_gallon`.
    pub fn for_distance(km: f64, fuel_price_per_gallon: f64) -> Self {
        let miles = km * MILES_PER_KM;
        let fuel_cost = miles / ASSUMED_MPG * fuel_price_per_gallon;
        Self {
            distance_km: round2(km),
            distance_miles: round2(miles),
            fuel_cost: round2(fuel_cost),
            total_cost: round2(fuel_cost * OVERHEAD_FACTOR),
        }
    }

    /// Cost of a route, measured along its sampled points.
    pub fn for_route(route: &Route, fuel_price_per_gallon: f64) -> Self {
        let km = cumulative_distances(route.points())
            .last()
            .copied()
            .unwrap_or(0.0);
        Self::for_distance(km, fuel_price_per_gallon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, RouteKind};

    #[test]
    fn hundred_kilometres() {
        let cost = RouteCost::for_distance(100.0, 3.50);

        assert_eq!(cost.distance_km, 100.0);
        // 62.1371 miles
        assert_eq!(cost.distance_miles, 62.14);
        // 62.1371 / 25 * 3.5 = 8.699194
        assert_eq!(cost.fuel_cost, 8.7);
        // 8.699194 * 1.1 = 9.5691134
        assert_eq!(cost.total_cost, 9.57);
    }

    #[test]
    fn zero_distance_is_free() {
        let cost = RouteCost::for_distance(0.0, 3.50);
        assert_eq!(cost.total_cost, 0.0);
        assert_eq!(cost.distance_miles, 0.0);
    }

    #[test]
    fn route_cost_uses_path_length() {
        let route = Route::new(
            RouteKind::Main,
            vec![
                Coordinate::new(0.0, 0.0).unwrap(),
                Coordinate::new(1.0, 0.0).unwrap(),
            ],
            0.0,
            0.0,
        )
        .unwrap();

        let cost = RouteCost::for_route(&route, 3.50);
        assert_eq!(cost.distance_km, 111.19);
    }
}
