//! Route resolution between two coordinates.
//!
//! Provider geometries can run to thousands of points. They are thinned to
//! roughly [`RESAMPLE_TARGET`] points before caching, which keeps the midpoint
//! scan cheap without moving the endpoints.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{GeoCache, RouteEntry, route_key};
use crate::domain::{Coordinate, Route, RouteKind};
use crate::providers::{Provider, ProviderError, ProviderRoute, RoutingProvider};
use crate::retry::RetryPolicy;

use super::error::MeetError;

/// Routes with at most this many points are kept as-is.
pub const RESAMPLE_THRESHOLD: usize = 10;

/// Approximate number of points kept when resampling a long route.
pub const RESAMPLE_TARGET: usize = 100;

/// Keep every `max(1, N / 100)`-th point of a long route, plus the last point.
pub fn resample(points: &[Coordinate]) -> Vec<Coordinate> {
    if points.len() <= RESAMPLE_THRESHOLD {
        return points.to_vec();
    }
    let step = (points.len() / RESAMPLE_TARGET).max(1);
    let mut sampled: Vec<Coordinate> = points.iter().step_by(step).copied().collect();
    let last = points.len() - 1;
    if last % step != 0 {
        sampled.push(points[last]);
    }
    sampled
}

/// Resolves driving routes through a [`RoutingProvider`].
pub struct RouteResolver<R> {
    provider: R,
    cache: Arc<GeoCache>,
    retry: RetryPolicy,
}

impl<R: RoutingProvider> RouteResolver<R> {
    pub fn new(provider: R, cache: Arc<GeoCache>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            cache,
            retry,
        }
    }

    /// Resolve the main route, or the provider's first alternative when
    /// `alternate` is set.
    ///
    /// When the provider offers no alternative, the alternate is the main
    /// geometry, flagged with [`Route::reuses_main_geometry`].
    pub async fn resolve_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        alternate: bool,
    ) -> Result<Route, MeetError> {
        let routes = self.fetch(origin, destination).await?;
        let kind = if alternate {
            RouteKind::Alternate
        } else {
            RouteKind::Main
        };
        pick(&routes, kind, origin, destination)
    }

    /// Resolve the main and alternate routes from a single provider response.
    pub async fn resolve_pair(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<(Route, Route), MeetError> {
        let routes = self.fetch(origin, destination).await?;
        Ok((
            pick(&routes, RouteKind::Main, origin, destination)?,
            pick(&routes, RouteKind::Alternate, origin, destination)?,
        ))
    }

    /// Resampled provider routes for the pair, from cache when possible.
    async fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteEntry, MeetError> {
        let key = route_key(origin, destination);

        if let Some(cached) = self.cache.get_routes(&key).await {
            debug!(%key, "route cache hit");
            return Ok(cached);
        }
        debug!(%key, "route cache miss");

        let raw = self
            .retry
            .run(ProviderError::is_transient, || {
                self.provider.routes(origin, destination)
            })
            .await
            .map_err(|e| MeetError::provider(Provider::Routing, e))?;

        if raw.is_empty() {
            return Err(no_route(origin, destination));
        }

        let resampled: Vec<ProviderRoute> = raw
            .into_iter()
            .map(|r| {
                debug!(points = r.coordinates.len(), "resampling provider route");
                ProviderRoute {
                    coordinates: resample(&r.coordinates),
                    ..r
                }
            })
            .collect();

        let entry = Arc::new(resampled);
        self.cache.insert_routes(key, Arc::clone(&entry)).await;
        Ok(entry)
    }
}

fn no_route(origin: Coordinate, destination: Coordinate) -> MeetError {
    MeetError::NoRouteFound {
        origin: origin.to_string(),
        destination: destination.to_string(),
    }
}

fn pick(
    routes: &[ProviderRoute],
    kind: RouteKind,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<Route, MeetError> {
    let build = |raw: &ProviderRoute, kind| {
        Route::new(kind, raw.coordinates.clone(), raw.distance_m, raw.duration_s)
            .map_err(|_| no_route(origin, destination))
    };

    match (kind, routes.get(kind.provider_index())) {
        (_, Some(raw)) => build(raw, kind),
        (RouteKind::Alternate, None) => {
            let main = routes.first().ok_or_else(|| no_route(origin, destination))?;
            Ok(build(main, RouteKind::Main)?.into_reused_alternate())
        }
        (RouteKind::Main, None) => Err(no_route(origin, destination)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::meeting::ErrorKind;
    use crate::providers::mock::MockRouter;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn line(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| coord(i as f64 * 0.001, 0.0)).collect()
    }

    fn resolver(router: MockRouter) -> (RouteResolver<Arc<MockRouter>>, Arc<MockRouter>) {
        let router = Arc::new(router);
        let resolver = RouteResolver::new(
            Arc::clone(&router),
            Arc::new(GeoCache::default()),
            RetryPolicy::default().with_base_delay(Duration::ZERO),
        );
        (resolver, router)
    }

    #[test]
    fn short_routes_are_not_resampled() {
        assert_eq!(resample(&line(10)), line(10));
        assert_eq!(resample(&line(2)), line(2));
    }

    #[test]
    fn eleven_points_keep_every_point() {
        assert_eq!(resample(&line(11)), line(11));
    }

    #[test]
    fn long_route_resamples_to_about_a_hundred() {
        let points = line(500);
        let sampled = resample(&points);

        assert_eq!(sampled.len(), 101);
        assert_eq!(sampled[0], points[0]);
        assert_eq!(sampled[1], points[5]);
        assert_eq!(*sampled.last().unwrap(), points[499]);
    }

    #[test]
    fn last_point_not_duplicated_when_on_step() {
        // 201 points, step 2: index 200 is already on the step
        let points = line(201);
        let sampled = resample(&points);
        assert_eq!(sampled.len(), 101);
        assert_eq!(*sampled.last().unwrap(), points[200]);
    }

    #[tokio::test]
    async fn main_and_alternate_from_provider() {
        let (resolver, _) = resolver(MockRouter::straight_lines(5).with_alternate());
        let (a, b) = (coord(40.0, -75.0), coord(41.0, -74.0));

        let main = resolver.resolve_route(a, b, false).await.unwrap();
        let alternate = resolver.resolve_route(a, b, true).await.unwrap();

        assert_eq!(main.kind(), RouteKind::Main);
        assert_eq!(alternate.kind(), RouteKind::Alternate);
        assert!(!alternate.reuses_main_geometry());
        assert_ne!(main.points(), alternate.points());
        assert_eq!(main.origin(), a);
        assert_eq!(main.destination(), b);
    }

    #[tokio::test]
    async fn single_route_alternate_reuses_main() {
        let (resolver, _) = resolver(MockRouter::straight_lines(5));
        let (a, b) = (coord(40.0, -75.0), coord(41.0, -74.0));

        let (main, alternate) = resolver.resolve_pair(a, b).await.unwrap();

        assert_eq!(alternate.kind(), RouteKind::Alternate);
        assert!(alternate.reuses_main_geometry());
        assert_eq!(main.points(), alternate.points());
    }

    #[tokio::test]
    async fn routes_are_cached_per_direction() {
        let (resolver, router) = resolver(MockRouter::straight_lines(5));
        let (a, b) = (coord(40.0, -75.0), coord(41.0, -74.0));

        resolver.resolve_route(a, b, false).await.unwrap();
        resolver.resolve_route(a, b, true).await.unwrap();
        resolver.resolve_pair(a, b).await.unwrap();
        assert_eq!(router.calls(), 1);

        resolver.resolve_route(b, a, false).await.unwrap();
        assert_eq!(router.calls(), 2);
    }

    #[tokio::test]
    async fn no_routes_is_no_route_found() {
        let (resolver, _) = resolver(MockRouter::new());

        let err = resolver
            .resolve_route(coord(0.0, 0.0), coord(1.0, 1.0), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRouteFound);
    }

    #[tokio::test]
    async fn single_point_route_is_no_route_found() {
        let (a, b) = (coord(0.0, 0.0), coord(1.0, 1.0));
        let router = MockRouter::new().with_routes(
            a,
            b,
            vec![ProviderRoute {
                coordinates: vec![a],
                distance_m: 0.0,
                duration_s: 0.0,
            }],
        );
        let (resolver, _) = resolver(router);

        let err = resolver.resolve_route(a, b, false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRouteFound);
    }

    #[tokio::test]
    async fn provider_metadata_is_kept() {
        let (a, b) = (coord(0.0, 0.0), coord(1.0, 1.0));
        let router = MockRouter::new().with_routes(
            a,
            b,
            vec![ProviderRoute {
                coordinates: vec![a, b],
                distance_m: 157_000.0,
                duration_s: 7_200.0,
            }],
        );
        let (resolver, _) = resolver(router);

        let route = resolver.resolve_route(a, b, false).await.unwrap();
        assert_eq!(route.distance_m(), 157_000.0);
        assert_eq!(route.duration_s(), 7_200.0);
    }

    #[tokio::test]
    async fn long_provider_routes_are_resampled() {
        let (resolver, _) = resolver(MockRouter::straight_lines(500));
        let (a, b) = (coord(40.0, -75.0), coord(41.0, -74.0));

        let route = resolver.resolve_route(a, b, false).await.unwrap();
        assert_eq!(route.len(), 101);
        assert_eq!(route.destination(), b);
    }
}
