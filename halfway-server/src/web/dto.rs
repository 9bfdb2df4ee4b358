//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, Coordinate, DriveTimeClass, MapLinks, PoiCandidate, Route, RouteKind,
};
use crate::geo::BoundingBox;
use crate::meeting::{MeetingPoint, Midpoint, RouteCost};

/// Request to find a meeting point between two locations.
#[derive(Debug, Deserialize)]
pub struct MeetRequest {
    /// First address, or a `"lat, lng"` literal
    pub location1: String,

    /// Second address, or a `"lat, lng"` literal
    pub location2: String,
}

/// Query for the geocode endpoint.
#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub q: String,
}

/// Query for the nearby places endpoint.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    /// Search centre
    pub lat: f64,
    pub lng: f64,

    /// Search radius in metres (defaults to the configured radius)
    pub radius: Option<u32>,

    /// Comma-separated category names, e.g. `"cafe,bar"` (defaults to all)
    pub categories: Option<String>,

    /// First origin for drive times (defaults to the centre)
    pub lat1: Option<f64>,
    pub lng1: Option<f64>,

    /// Second origin for drive times (defaults to the centre)
    pub lat2: Option<f64>,
    pub lng2: Option<f64>,
}

/// A route in a meeting-point response.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub kind: RouteKind,

    /// Sampled path from the first origin to the second
    pub points: Vec<Coordinate>,

    /// Provider-reported length in metres
    pub distance_m: f64,

    /// Provider-reported travel time in seconds
    pub duration_s: f64,

    /// True when no separate alternate route was available
    pub reuses_main_geometry: bool,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            kind: route.kind(),
            points: route.points().to_vec(),
            distance_m: route.distance_m(),
            duration_s: route.duration_s(),
            reuses_main_geometry: route.reuses_main_geometry(),
        }
    }
}

/// A candidate meeting place.
#[derive(Debug, Serialize)]
pub struct PlaceResult {
    pub id: i64,
    pub name: String,
    pub location: Coordinate,
    pub category: Category,

    /// Display label of the category, e.g. "Cafes"
    pub category_label: &'static str,

    pub address: String,

    /// Minutes from the first origin
    pub drive_time_from1: u32,

    /// Minutes from the second origin
    pub drive_time_from2: u32,

    pub total_drive_time: u32,

    /// How much longer one party drives than the other, in minutes
    pub drive_time_gap: u32,

    pub drive_time_class1: DriveTimeClass,
    pub drive_time_class2: DriveTimeClass,

    /// Which route's midpoint the place was found around
    pub source_route: RouteKind,

    pub map_links: MapLinks,
}

impl PlaceResult {
    pub fn from_candidate(candidate: &PoiCandidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name.clone(),
            location: candidate.location,
            category: candidate.category,
            category_label: candidate.category.label(),
            address: candidate.address.clone(),
            drive_time_from1: candidate.drive_time_from1,
            drive_time_from2: candidate.drive_time_from2,
            total_drive_time: candidate.total_drive_time(),
            drive_time_gap: candidate.drive_time_gap(),
            drive_time_class1: candidate.class_from1(),
            drive_time_class2: candidate.class_from2(),
            source_route: candidate.source_route,
            map_links: candidate.map_links.clone(),
        }
    }
}

/// Response to a meeting-point request.
#[derive(Debug, Serialize)]
pub struct MeetResponse {
    pub origin1: Coordinate,
    pub origin2: Coordinate,
    pub midpoint: Midpoint,
    pub alternate_midpoint: Midpoint,
    pub route: RouteResult,
    pub alternate_route: RouteResult,

    /// Places ranked by combined drive time
    pub places: Vec<PlaceResult>,

    pub bounds: BoundingBox,
    pub cost: RouteCost,
}

impl MeetResponse {
    pub fn from_meeting_point(point: &MeetingPoint) -> Self {
        Self {
            origin1: point.origin1,
            origin2: point.origin2,
            midpoint: point.midpoint,
            alternate_midpoint: point.alternate_midpoint,
            route: RouteResult::from_route(&point.route),
            alternate_route: RouteResult::from_route(&point.alternate_route),
            places: point.places.iter().map(PlaceResult::from_candidate).collect(),
            bounds: point.bounds,
            cost: point.cost,
        }
    }
}

/// Response to a geocode request.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub query: String,
    pub location: Coordinate,
}

/// Response to a nearby places request.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub center: Coordinate,
    pub places: Vec<PlaceResult>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Message suitable for showing to the user
    pub error: String,

    /// Machine-readable error kind, e.g. "not_found"
    pub kind: String,

    /// Pipeline stage that failed, for meeting-point requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}
