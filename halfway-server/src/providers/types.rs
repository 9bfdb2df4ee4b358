//! Provider wire types and the provider-neutral values built from them.
//!
//! The `*Response`/`*Element` structs mirror the JSON the public services
//! return. Everything else in the crate only sees [`GeocodeHit`],
//! [`ProviderRoute`] and [`PlaceElement`].

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::{Category, Coordinate};

/// One geocoding candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub location: Coordinate,
    /// Provider's formatted name for the match, if any.
    pub display_name: Option<String>,
}

/// A route as returned by a routing provider, before resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRoute {
    pub coordinates: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// The OSM element type of a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

/// A raw place from the places provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceElement {
    pub id: i64,
    pub kind: ElementKind,
    /// Node position, or the centre of a way. `None` when the provider gave neither.
    pub location: Option<Coordinate>,
    pub tags: HashMap<String, String>,
}

impl PlaceElement {
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str).filter(|n| !n.trim().is_empty())
    }
}

/// A radius search around a point.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesQuery {
    pub center: Coordinate,
    pub radius_m: u32,
    pub categories: Vec<Category>,
    /// Maximum number of elements the provider should return.
    pub limit: usize,
}

// ---------------------------------------------------------------------------
// Nominatim
// ---------------------------------------------------------------------------

/// An entry of Nominatim's `/search?format=json` array.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimPlace {
    /// `None` when either component fails to parse or is out of range.
    pub fn to_hit(&self) -> Option<GeocodeHit> {
        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lon.trim().parse().ok()?;
        Some(GeocodeHit {
            location: Coordinate::new(lat, lng).ok()?,
            display_name: self.display_name.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// OSRM
// ---------------------------------------------------------------------------

/// Body of an OSRM `/route/v1` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl OsrmResponse {
    /// Codes meaning the request was fine but no road connects the points.
    pub fn is_no_route(&self) -> bool {
        matches!(self.code.as_str(), "NoRoute" | "NoSegment")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    pub geometry: OsrmGeometry,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// GeoJSON `LineString`. Positions are `[lng, lat]`.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl OsrmRoute {
    /// Convert to a provider route, swapping GeoJSON `[lng, lat]` order.
    ///
    /// `None` if any position is out of range.
    pub fn to_provider_route(&self) -> Option<ProviderRoute> {
        let coordinates = self
            .geometry
            .coordinates
            .iter()
            .map(|[lng, lat]| Coordinate::new(*lat, *lng).ok())
            .collect::<Option<Vec<_>>>()?;
        Some(ProviderRoute {
            coordinates,
            distance_m: self.distance,
            duration_s: self.duration,
        })
    }
}

// ---------------------------------------------------------------------------
// Overpass
// ---------------------------------------------------------------------------

/// Body of an Overpass `[out:json]` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Present on ways and relations requested with `out center`.
    #[serde(default)]
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl From<OverpassElement> for PlaceElement {
    fn from(el: OverpassElement) -> Self {
        let location = match (el.lat, el.lon, el.center) {
            (Some(lat), Some(lon), _) => Coordinate::new(lat, lon).ok(),
            (_, _, Some(c)) => Coordinate::new(c.lat, c.lon).ok(),
            _ => None,
        };
        PlaceElement {
            id: el.id,
            kind: el.kind,
            location,
            tags: el.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_parses_string_coordinates() {
        let json = r#"[{"lat": "40.7127281", "lon": "-74.0060152", "display_name": "New York"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let hit = places[0].to_hit().unwrap();
        assert_eq!(hit.location, Coordinate::new(40.7127281, -74.0060152).unwrap());
        assert_eq!(hit.display_name.as_deref(), Some("New York"));
    }

    #[test]
    fn nominatim_rejects_garbage_coordinates() {
        let place = NominatimPlace {
            lat: "north".into(),
            lon: "0".into(),
            display_name: None,
        };
        assert!(place.to_hit().is_none());
    }

    #[test]
    fn osrm_swaps_lng_lat() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "geometry": {"type": "LineString", "coordinates": [[-75.0, 40.0], [-74.0, 41.0]]},
                "distance": 140000.5,
                "duration": 5400.0
            }]
        }"#;
        let resp: OsrmResponse = serde_json::from_str(json).unwrap();
        let route = resp.routes[0].to_provider_route().unwrap();
        assert_eq!(route.coordinates[0], Coordinate::new(40.0, -75.0).unwrap());
        assert_eq!(route.coordinates[1], Coordinate::new(41.0, -74.0).unwrap());
        assert_eq!(route.distance_m, 140000.5);
        assert_eq!(route.duration_s, 5400.0);
    }

    #[test]
    fn osrm_no_route_codes() {
        let resp: OsrmResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#).unwrap();
        assert!(resp.is_no_route());
        assert!(resp.routes.is_empty());
    }

    #[test]
    fn overpass_node_and_way_locations() {
        let json = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 40.1, "lon": -75.1, "tags": {"name": "Cafe", "amenity": "cafe"}},
                {"type": "way", "id": 2, "center": {"lat": 40.2, "lon": -75.2}, "tags": {"name": "Mall", "shop": "mall"}},
                {"type": "way", "id": 3, "tags": {"name": "Nowhere"}}
            ]
        }"#;
        let resp: OverpassResponse = serde_json::from_str(json).unwrap();
        let places: Vec<PlaceElement> = resp.elements.into_iter().map(Into::into).collect();

        assert_eq!(places[0].location, Some(Coordinate::new(40.1, -75.1).unwrap()));
        assert_eq!(places[1].kind, ElementKind::Way);
        assert_eq!(places[1].location, Some(Coordinate::new(40.2, -75.2).unwrap()));
        assert_eq!(places[2].location, None);
        assert_eq!(places[0].name(), Some("Cafe"));
    }

    #[test]
    fn blank_names_are_missing() {
        let place = PlaceElement {
            id: 1,
            kind: ElementKind::Node,
            location: None,
            tags: HashMap::from([("name".to_string(), "  ".to_string())]),
        };
        assert_eq!(place.name(), None);
    }
}
