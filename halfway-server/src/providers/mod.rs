//! External geocoding, routing and places services.
//!
//! Each service sits behind a small trait so the meeting-point pipeline can
//! run against the public OpenStreetMap services in production and against
//! in-memory doubles in tests:
//!
//! - [`GeocodingProvider`]: Nominatim `/search`
//! - [`RoutingProvider`]: OSRM `/route/v1` with alternatives
//! - [`PlacesProvider`]: Overpass QL radius queries
//!
//! Clients bound their in-flight requests with a semaphore and map HTTP
//! failures to [`ProviderError`]. Retries and caching happen a layer up.

use std::future::Future;
use std::sync::Arc;

mod error;
pub mod mock;
mod nominatim;
mod osrm;
mod overpass;
mod types;

pub use error::{Provider, ProviderError};
pub use nominatim::{NominatimClient, NominatimConfig};
pub use osrm::{OsrmClient, OsrmConfig};
pub use overpass::{OverpassClient, OverpassConfig, build_query};
pub use types::{ElementKind, GeocodeHit, PlaceElement, PlacesQuery, ProviderRoute};

use crate::domain::Coordinate;

/// Resolves free text to candidate coordinates, best match first.
pub trait GeocodingProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<GeocodeHit>, ProviderError>> + Send;
}

/// Computes driving routes between two points.
pub trait RoutingProvider: Send + Sync {
    /// The primary route followed by any alternatives the provider offers.
    fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Vec<ProviderRoute>, ProviderError>> + Send;
}

/// Finds tagged places around a point.
pub trait PlacesProvider: Send + Sync {
    fn nearby(
        &self,
        query: &PlacesQuery,
    ) -> impl Future<Output = Result<Vec<PlaceElement>, ProviderError>> + Send;
}

impl<T: GeocodingProvider> GeocodingProvider for Arc<T> {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<GeocodeHit>, ProviderError>> + Send {
        (**self).search(query)
    }
}

impl<T: RoutingProvider> RoutingProvider for Arc<T> {
    fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Vec<ProviderRoute>, ProviderError>> + Send {
        (**self).routes(origin, destination)
    }
}

impl<T: PlacesProvider> PlacesProvider for Arc<T> {
    fn nearby(
        &self,
        query: &PlacesQuery,
    ) -> impl Future<Output = Result<Vec<PlaceElement>, ProviderError>> + Send {
        (**self).nearby(query)
    }
}
