//! Candidate meeting places.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use super::{Category, Coordinate, RouteKind};

/// Address placeholder for places without address tags.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Coarse bucket for a drive time, used to colour results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveTimeClass {
    /// Under 15 minutes.
    Quick,
    /// Under 30 minutes.
    Moderate,
    Long,
}

impl DriveTimeClass {
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes < 15 {
            DriveTimeClass::Quick
        } else if minutes < 30 {
            DriveTimeClass::Moderate
        } else {
            DriveTimeClass::Long
        }
    }
}

/// Deep links opening a place in common navigation apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapLinks {
    pub google: String,
    pub apple: String,
    pub waze: String,
}

impl MapLinks {
    /// Build links that search for `"{name}, {address}"`.
    pub fn for_place(name: &str, address: &str) -> Self {
        let query = if address.is_empty() || address == UNKNOWN_ADDRESS {
            name.to_string()
        } else {
            format!("{name}, {address}")
        };
        let q = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();

        Self {
            google: format!("https://www.google.com/maps/search/?api=1&query={q}"),
            apple: format!("http://maps.apple.com/?address={q}"),
            waze: format!("https://waze.com/ul?q={q}&navigate=yes"),
        }
    }
}

/// A named place near a midpoint, with drive times from both origins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiCandidate {
    /// Provider element id (OpenStreetMap node/way id).
    pub id: i64,
    pub name: String,
    pub location: Coordinate,
    pub category: Category,
    /// Postal address, or [`UNKNOWN_ADDRESS`].
    pub address: String,
    /// Estimated minutes from the first origin.
    pub drive_time_from1: u32,
    /// Estimated minutes from the second origin.
    pub drive_time_from2: u32,
    /// Which route's midpoint this place was found around.
    pub source_route: RouteKind,
    pub map_links: MapLinks,
}

impl PoiCandidate {
    /// Combined drive time, the ranking key.
    pub fn total_drive_time(&self) -> u32 {
        self.drive_time_from1 + self.drive_time_from2
    }

    /// Absolute difference between the two drive times.
    pub fn drive_time_gap(&self) -> u32 {
        self.drive_time_from1.abs_diff(self.drive_time_from2)
    }

    pub fn class_from1(&self) -> DriveTimeClass {
        DriveTimeClass::from_minutes(self.drive_time_from1)
    }

    pub fn class_from2(&self) -> DriveTimeClass {
        DriveTimeClass::from_minutes(self.drive_time_from2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_time_classes() {
        assert_eq!(DriveTimeClass::from_minutes(0), DriveTimeClass::Quick);
        assert_eq!(DriveTimeClass::from_minutes(14), DriveTimeClass::Quick);
        assert_eq!(DriveTimeClass::from_minutes(15), DriveTimeClass::Moderate);
        assert_eq!(DriveTimeClass::from_minutes(29), DriveTimeClass::Moderate);
        assert_eq!(DriveTimeClass::from_minutes(30), DriveTimeClass::Long);
        assert_eq!(DriveTimeClass::from_minutes(240), DriveTimeClass::Long);
    }

    #[test]
    fn map_links_encode_name_and_address() {
        let links = MapLinks::for_place("Joe's Cafe", "Main St, Springfield");
        assert_eq!(
            links.google,
            "https://www.google.com/maps/search/?api=1&query=Joe%27s%20Cafe%2C%20Main%20St%2C%20Springfield"
        );
        assert!(links.apple.starts_with("http://maps.apple.com/?address=Joe%27s"));
        assert!(links.waze.ends_with("&navigate=yes"));
    }

    #[test]
    fn map_links_skip_unknown_address() {
        let links = MapLinks::for_place("Park", UNKNOWN_ADDRESS);
        assert_eq!(
            links.google,
            "https://www.google.com/maps/search/?api=1&query=Park"
        );
    }

    #[test]
    fn candidate_totals() {
        let candidate = PoiCandidate {
            id: 1,
            name: "Diner".to_string(),
            location: Coordinate::new(40.0, -75.0).unwrap(),
            category: Category::Restaurant,
            address: UNKNOWN_ADDRESS.to_string(),
            drive_time_from1: 12,
            drive_time_from2: 31,
            source_route: RouteKind::Main,
            map_links: MapLinks::for_place("Diner", UNKNOWN_ADDRESS),
        };

        assert_eq!(candidate.total_drive_time(), 43);
        assert_eq!(candidate.drive_time_gap(), 19);
        assert_eq!(candidate.class_from1(), DriveTimeClass::Quick);
        assert_eq!(candidate.class_from2(), DriveTimeClass::Long);
    }
}
