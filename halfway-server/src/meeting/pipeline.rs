//! End-to-end meeting-point search.
//!
//! Geocodes both addresses, resolves the main and alternate routes between
//! them, finds each route's halfway point and ranks the places around both.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::GeoCache;
use crate::domain::{Coordinate, PoiCandidate, Route, RouteKind};
use crate::geo::{BoundingBox, bounding_box};
use crate::providers::{GeocodingProvider, PlacesProvider, RoutingProvider};

use super::config::MeetingConfig;
use super::cost::RouteCost;
use super::drive_time::DriveTimeEstimator;
use super::error::{MeetError, PipelineFailure};
use super::geocoder::Geocoder;
use super::midpoint::{Midpoint, compute_midpoint};
use super::places::{PoiSearch, PoiSearchRequest};
use super::rank::merge;
use super::routes::RouteResolver;

/// Progress of a single pipeline run.
///
/// Runs move strictly forward through these stages. A failure is reported
/// as a [`PipelineFailure`] carrying the stage that was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Geocoding,
    Routing,
    /// Routes are known and midpoints are being computed.
    MidpointComputed,
    SearchingPois,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Idle => "idle",
            Stage::Geocoding => "geocoding",
            Stage::Routing => "routing",
            Stage::MidpointComputed => "computing midpoints",
            Stage::SearchingPois => "searching places",
            Stage::Done => "done",
        })
    }
}

/// Result of a successful meeting-point search.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingPoint {
    pub origin1: Coordinate,
    pub origin2: Coordinate,
    pub midpoint: Midpoint,
    pub alternate_midpoint: Midpoint,
    pub route: Route,
    pub alternate_route: Route,
    /// Places around both midpoints, best first.
    pub places: Vec<PoiCandidate>,
    /// Map bounds enclosing both origins and both midpoints.
    pub bounds: BoundingBox,
    /// Cost estimate for the main route.
    pub cost: RouteCost,
}

fn failed<E: Into<MeetError>>(stage: Stage) -> impl FnOnce(E) -> PipelineFailure {
    move |error| PipelineFailure {
        stage,
        error: error.into(),
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "pipeline stage");
}

/// The meeting-point orchestrator.
///
/// Generic over its three providers so the same pipeline runs against the
/// public OpenStreetMap services or the in-memory mocks.
pub struct Pipeline<G, R, P> {
    geocoder: Geocoder<G>,
    routes: RouteResolver<R>,
    places: PoiSearch<P>,
    config: MeetingConfig,
}

impl<G, R, P> Pipeline<G, R, P>
where
    G: GeocodingProvider,
    R: RoutingProvider,
    P: PlacesProvider,
{
    /// Wire the providers to a shared cache. Every provider call uses
    /// `config.retry`.
    pub fn new(
        geocoding: G,
        routing: R,
        places: P,
        cache: Arc<GeoCache>,
        config: MeetingConfig,
    ) -> Self {
        let retry = config.retry;
        Self {
            geocoder: Geocoder::new(geocoding, Arc::clone(&cache), retry),
            routes: RouteResolver::new(routing, Arc::clone(&cache), retry),
            places: PoiSearch::new(
                places,
                DriveTimeEstimator::new(cache, config.drive_time_jitter),
                retry,
            ),
            config,
        }
    }

    pub fn config(&self) -> &MeetingConfig {
        &self.config
    }

    pub fn geocoder(&self) -> &Geocoder<G> {
        &self.geocoder
    }

    pub fn places(&self) -> &PoiSearch<P> {
        &self.places
    }

    /// A place search around `center` using the configured radius, limit
    /// and categories.
    pub fn poi_request(
        &self,
        center: Coordinate,
        origin1: Coordinate,
        origin2: Coordinate,
        source_route: RouteKind,
    ) -> PoiSearchRequest {
        PoiSearchRequest {
            center,
            radius_m: self.config.search_radius_m,
            categories: self.config.categories.clone(),
            limit: self.config.poi_limit,
            origin1,
            origin2,
            source_route,
        }
    }

    /// Find where two people starting at `address1` and `address2` should meet.
    ///
    /// Any failing stage aborts the whole run; nothing partial is returned.
    /// When the router offers no alternative route, the alternate route and
    /// midpoint repeat the main ones and only one place search is made.
    #[tracing::instrument(skip(self))]
    pub async fn find_meeting_point(
        &self,
        address1: &str,
        address2: &str,
    ) -> Result<MeetingPoint, PipelineFailure> {
        enter(Stage::Idle);

        enter(Stage::Geocoding);
        let (origin1, origin2) = tokio::join!(
            self.geocoder.geocode(address1),
            self.geocoder.geocode(address2),
        );
        let origin1 = origin1.map_err(failed(Stage::Geocoding))?;
        let origin2 = origin2.map_err(failed(Stage::Geocoding))?;

        enter(Stage::Routing);
        let (route, alternate_route) = self
            .routes
            .resolve_pair(origin1, origin2)
            .await
            .map_err(failed(Stage::Routing))?;

        enter(Stage::MidpointComputed);
        let midpoint = compute_midpoint(&route).map_err(failed(Stage::MidpointComputed))?;
        let alternate_midpoint =
            compute_midpoint(&alternate_route).map_err(failed(Stage::MidpointComputed))?;
        let bounds = bounding_box(
            &[origin1, origin2, midpoint.location, alternate_midpoint.location],
            self.config.bounds_padding,
        )
        .map_err(failed(Stage::MidpointComputed))?;

        enter(Stage::SearchingPois);
        let main_request = self.poi_request(midpoint.location, origin1, origin2, RouteKind::Main);
        let alternate_request = self.poi_request(
            alternate_midpoint.location,
            origin1,
            origin2,
            RouteKind::Alternate,
        );
        let (main_places, alternate_places) = if alternate_route.reuses_main_geometry() {
            (self.places.search_pois(&main_request).await, Ok(Vec::new()))
        } else {
            tokio::join!(
                self.places.search_pois(&main_request),
                self.places.search_pois(&alternate_request),
            )
        };
        let places = merge(
            main_places.map_err(failed(Stage::SearchingPois))?,
            alternate_places.map_err(failed(Stage::SearchingPois))?,
            self.config.poi_limit,
        );

        let cost = RouteCost::for_route(&route, self.config.fuel_price_per_gallon);

        enter(Stage::Done);
        info!(
            places = places.len(),
            distance_km = cost.distance_km,
            alternate = !alternate_route.reuses_main_geometry(),
            "meeting point found"
        );

        Ok(MeetingPoint {
            origin1,
            origin2,
            midpoint,
            alternate_midpoint,
            route,
            alternate_route,
            places,
            bounds,
            cost,
        })
    }
}
