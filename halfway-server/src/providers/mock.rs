//! In-memory providers for tests and offline development.
//!
//! Each mock counts its calls and can be scripted to fail its next calls
//! with given HTTP statuses, which is enough to exercise caching and retry
//! behaviour without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use crate::domain::Coordinate;
use crate::geo;

use super::error::ProviderError;
use super::types::{ElementKind, GeocodeHit, PlaceElement, PlacesQuery, ProviderRoute};
use super::{GeocodingProvider, PlacesProvider, RoutingProvider};

/// Pops the next scripted failure, if any.
async fn scripted_failure(failures: &Mutex<VecDeque<u16>>) -> Option<ProviderError> {
    failures
        .lock()
        .await
        .pop_front()
        .map(|status| ProviderError::Api {
            status,
            message: "scripted failure".to_string(),
        })
}

/// Geocoder answering from a fixed address table.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    places: HashMap<String, Coordinate>,
    failures: Mutex<VecDeque<u16>>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `address` (matched exactly) to `location`.
    pub fn with_place(mut self, address: impl Into<String>, location: Coordinate) -> Self {
        self.places.insert(address.into(), location);
        self
    }

    /// Fail the next calls with these statuses, in order.
    pub fn with_failures(self, statuses: impl IntoIterator<Item = u16>) -> Self {
        Self {
            failures: Mutex::new(statuses.into_iter().collect()),
            ..self
        }
    }

    /// Number of `search` calls so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeocodingProvider for MockGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeHit>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = scripted_failure(&self.failures).await {
            return Err(err);
        }
        Ok(self
            .places
            .get(query)
            .map(|&location| GeocodeHit {
                location,
                display_name: Some(query.to_string()),
            })
            .into_iter()
            .collect())
    }
}

/// Router returning scripted routes, or straight lines between any two points.
#[derive(Debug, Default)]
pub struct MockRouter {
    routes: HashMap<String, Vec<ProviderRoute>>,
    /// Points in a generated straight-line route. `None` means "no route".
    generated_points: Option<usize>,
    generate_alternate: bool,
    failures: Mutex<VecDeque<u16>>,
    calls: AtomicUsize,
}

fn route_key(origin: Coordinate, destination: Coordinate) -> String {
    format!("{origin}-{destination}")
}

impl MockRouter {
    /// A router that finds no route unless one is scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// A router that connects any two points with an evenly sampled straight line.
    pub fn straight_lines(points: usize) -> Self {
        Self {
            generated_points: Some(points.max(2)),
            ..Self::default()
        }
    }

    /// Also return a second, slightly bowed route with the same endpoints.
    pub fn with_alternate(mut self) -> Self {
        self.generate_alternate = true;
        self
    }

    /// Return `routes` for this exact origin/destination pair.
    pub fn with_routes(
        mut self,
        origin: Coordinate,
        destination: Coordinate,
        routes: Vec<ProviderRoute>,
    ) -> Self {
        self.routes.insert(route_key(origin, destination), routes);
        self
    }

    pub fn with_failures(self, statuses: impl IntoIterator<Item = u16>) -> Self {
        Self {
            failures: Mutex::new(statuses.into_iter().collect()),
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn generate(&self, origin: Coordinate, destination: Coordinate, n: usize) -> Vec<ProviderRoute> {
        let line = |bow: f64| {
            let coordinates: Vec<Coordinate> = (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    let p = geo::interpolate(origin, destination, t);
                    // Endpoints stay put; interior points shift north
                    let shift = if i == 0 || i == n - 1 { 0.0 } else { bow };
                    Coordinate::clamped(p.lat() + shift, p.lng())
                })
                .collect();
            let distance_m = coordinates
                .windows(2)
                .map(|w| geo::haversine_distance_km(w[0], w[1]) * 1000.0)
                .sum::<f64>();
            ProviderRoute {
                coordinates,
                distance_m,
                // 60 km/h
                duration_s: distance_m * 0.06,
            }
        };

        let mut routes = vec![line(0.0)];
        if self.generate_alternate {
            routes.push(line(0.01));
        }
        routes
    }
}

impl RoutingProvider for MockRouter {
    async fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<ProviderRoute>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = scripted_failure(&self.failures).await {
            return Err(err);
        }
        if let Some(routes) = self.routes.get(&route_key(origin, destination)) {
            return Ok(routes.clone());
        }
        Ok(match self.generated_points {
            Some(n) => self.generate(origin, destination, n),
            None => Vec::new(),
        })
    }
}

/// Places provider returning the same elements for every query.
#[derive(Debug, Default)]
pub struct MockPlaces {
    elements: Vec<PlaceElement>,
    failures: Mutex<VecDeque<u16>>,
    queries: Mutex<Vec<PlacesQuery>>,
    calls: AtomicUsize,
}

impl MockPlaces {
    pub fn new(elements: Vec<PlaceElement>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn with_failures(self, statuses: impl IntoIterator<Item = u16>) -> Self {
        Self {
            failures: Mutex::new(statuses.into_iter().collect()),
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every query received so far, in arrival order.
    pub async fn queries(&self) -> Vec<PlacesQuery> {
        self.queries.lock().await.clone()
    }
}

impl PlacesProvider for MockPlaces {
    async fn nearby(&self, query: &PlacesQuery) -> Result<Vec<PlaceElement>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().await.push(query.clone());
        if let Some(err) = scripted_failure(&self.failures).await {
            return Err(err);
        }
        Ok(self.elements.iter().take(query.limit).cloned().collect())
    }
}

/// A tagged node at `(lat, lng)`, clamped into range.
pub fn node(id: i64, lat: f64, lng: f64, tags: &[(&str, &str)]) -> PlaceElement {
    PlaceElement {
        id,
        kind: ElementKind::Node,
        location: Some(Coordinate::clamped(lat, lng)),
        tags: tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}
