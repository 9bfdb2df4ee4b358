//! Place search around a midpoint.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::debug;

use crate::domain::{
    Category, Coordinate, MapLinks, PoiCandidate, RouteKind, UNKNOWN_ADDRESS, classify,
};
use crate::providers::{PlaceElement, PlacesProvider, PlacesQuery, Provider, ProviderError};
use crate::retry::RetryPolicy;

use super::drive_time::DriveTimeEstimator;
use super::error::MeetError;
use super::rank::rank_and_limit;

/// Parameters of one place search.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSearchRequest {
    pub center: Coordinate,
    pub radius_m: u32,
    /// Categories to search. Empty, or only [`Category::Other`], means all.
    pub categories: Vec<Category>,
    pub limit: usize,
    pub origin1: Coordinate,
    pub origin2: Coordinate,
    /// Route whose midpoint `center` is, recorded on each candidate.
    pub source_route: RouteKind,
}

/// Postal address from `addr:*` tags, or [`UNKNOWN_ADDRESS`].
///
/// Formats as `"{housenumber} {street}, {city}, {state}"`, skipping missing parts.
pub fn format_address(tags: &HashMap<String, String>) -> String {
    let tag = |key: &str| {
        tags.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let street = match (tag("addr:housenumber"), tag("addr:street")) {
        (Some(number), Some(street)) => Some(format!("{number} {street}")),
        (None, Some(street)) => Some(street.to_string()),
        _ => None,
    };

    let parts: Vec<String> = street
        .into_iter()
        .chain(tag("addr:city").map(str::to_string))
        .chain(tag("addr:state").map(str::to_string))
        .collect();

    if parts.is_empty() {
        UNKNOWN_ADDRESS.to_string()
    } else {
        parts.join(", ")
    }
}

/// Searches a [`PlacesProvider`] and turns raw elements into ranked candidates.
pub struct PoiSearch<P> {
    provider: P,
    drive_times: DriveTimeEstimator,
    retry: RetryPolicy,
}

impl<P: PlacesProvider> PoiSearch<P> {
    pub fn new(provider: P, drive_times: DriveTimeEstimator, retry: RetryPolicy) -> Self {
        Self {
            provider,
            drive_times,
            retry,
        }
    }

    /// Find named places around `request.center`, with drive times from both
    /// origins, deduplicated and sorted by combined drive time.
    ///
    /// Elements without a name or a position are skipped. A provider that
    /// finds nothing yields an empty list, not an error.
    pub async fn search_pois(
        &self,
        request: &PoiSearchRequest,
    ) -> Result<Vec<PoiCandidate>, MeetError> {
        let categories: Vec<Category> = request
            .categories
            .iter()
            .copied()
            .filter(|c| c.tag_filter().is_some())
            .collect();

        let query = PlacesQuery {
            center: request.center,
            radius_m: request.radius_m,
            categories,
            limit: request.limit,
        };

        let elements = self
            .retry
            .run(ProviderError::is_transient, || self.provider.nearby(&query))
            .await
            .map_err(|e| MeetError::provider(Provider::Places, e))?;

        let found = elements.len();
        let named: Vec<(PlaceElement, String, Coordinate)> = elements
            .into_iter()
            .filter_map(|el| {
                let name = el.name()?.trim().to_string();
                let location = el.location?;
                Some((el, name, location))
            })
            .collect();
        debug!(
            found,
            usable = named.len(),
            route = %request.source_route,
            "places around midpoint"
        );

        let candidates = join_all(named.into_iter().map(|(el, name, location)| async move {
            let (from1, from2) = tokio::join!(
                self.drive_times.estimate_minutes(request.origin1, location),
                self.drive_times.estimate_minutes(request.origin2, location),
            );
            let address = format_address(&el.tags);
            PoiCandidate {
                id: el.id,
                map_links: MapLinks::for_place(&name, &address),
                name,
                location,
                category: classify(&el.tags),
                address,
                drive_time_from1: from1,
                drive_time_from2: from2,
                source_route: request.source_route,
            }
        }))
        .await;

        Ok(rank_and_limit(candidates, request.limit))
    }
}
