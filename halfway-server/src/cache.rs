//! Process-wide caches for provider results.
//!
//! One [`GeoCache`] is shared by every request. It holds three bounded,
//! TTL-expiring maps: geocoded addresses, resampled provider routes and
//! drive-time estimates. Keys are plain strings built from the normalized
//! input so entries are easy to inspect in logs.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Coordinate;
use crate::providers::ProviderRoute;

/// Cached route list for one origin/destination pair, primary route first.
pub type RouteEntry = Arc<Vec<ProviderRoute>>;

/// Configuration for the caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of entries in each cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Route cache key. Direction matters: A→B and B→A are distinct entries.
pub fn route_key(origin: Coordinate, destination: Coordinate) -> String {
    format!("{origin},{destination}")
}

/// Drive-time cache key, identical for `(a, b)` and `(b, a)`.
pub fn drive_time_key(a: Coordinate, b: Coordinate) -> String {
    let (a, b) = (a.to_string(), b.to_string());
    if a <= b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

/// Shared caches for geocoding, routing and drive-time results.
pub struct GeoCache {
    /// Normalized address → coordinate.
    geocodes: MokaCache<String, Coordinate>,

    /// `"{origin},{destination}"` → resampled routes.
    routes: MokaCache<String, RouteEntry>,

    /// Unordered coordinate pair → minutes.
    drive_times: MokaCache<String, u32>,
}

impl GeoCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        fn build<V: Clone + Send + Sync + 'static>(config: &CacheConfig) -> MokaCache<String, V> {
            MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build()
        }

        Self {
            geocodes: build(config),
            routes: build(config),
            drive_times: build(config),
        }
    }

    pub async fn get_geocode(&self, address: &str) -> Option<Coordinate> {
        self.geocodes.get(address).await
    }

    pub async fn insert_geocode(&self, address: String, location: Coordinate) {
        self.geocodes.insert(address, location).await;
    }

    pub async fn get_routes(&self, key: &str) -> Option<RouteEntry> {
        self.routes.get(key).await
    }

    pub async fn insert_routes(&self, key: String, routes: RouteEntry) {
        self.routes.insert(key, routes).await;
    }

    pub async fn get_drive_time(&self, key: &str) -> Option<u32> {
        self.drive_times.get(key).await
    }

    pub async fn insert_drive_time(&self, key: String, minutes: u32) {
        self.drive_times.insert(key, minutes).await;
    }
}

impl Default for GeoCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
