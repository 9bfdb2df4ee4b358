//! Straight-line drive-time estimates.
//!
//! Calling a routing provider for every candidate place would cost two
//! requests per place, so drive times are estimated from great-circle
//! distance and a speed that rises with distance (town streets, then
//! arterials, then highways).

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::cache::{GeoCache, drive_time_key};
use crate::domain::Coordinate;
use crate::geo::haversine_distance_km;

/// Average speed (km/h) for trips under 5 km.
pub const LOCAL_SPEED_KMH: f64 = 40.0;
/// Average speed (km/h) for trips of 5 to 20 km.
pub const ARTERIAL_SPEED_KMH: f64 = 55.0;
/// Average speed (km/h) for trips of 20 km or more.
pub const HIGHWAY_SPEED_KMH: f64 = 70.0;

pub fn speed_for_distance(km: f64) -> f64 {
    if km < 5.0 {
        LOCAL_SPEED_KMH
    } else if km < 20.0 {
        ARTERIAL_SPEED_KMH
    } else {
        HIGHWAY_SPEED_KMH
    }
}

/// Whole minutes to drive `km` at the tiered speed, rounded to nearest.
pub fn minutes_for_distance(km: f64) -> u32 {
    let km = if km.is_finite() { km.max(0.0) } else { 0.0 };
    (km / speed_for_distance(km) * 60.0).round() as u32
}

/// Scale `minutes` by a random factor in `[1 - jitter, 1 + jitter]`.
fn jittered(minutes: f64, jitter: f64) -> u32 {
    let factor = 1.0 + rand::rng().random_range(-jitter..=jitter);
    (minutes * factor).round().max(0.0) as u32
}

/// Memoized drive-time estimates between coordinate pairs.
pub struct DriveTimeEstimator {
    cache: Arc<GeoCache>,
    /// Relative jitter in `(0, 1]`, or `None` for deterministic estimates.
    jitter: Option<f64>,
}

impl DriveTimeEstimator {
    /// `jitter` outside `(0, 1]` (including NaN) disables jitter.
    pub fn new(cache: Arc<GeoCache>, jitter: Option<f64>) -> Self {
        let jitter = jitter.filter(|j| *j > 0.0 && *j <= 1.0);
        Self { cache, jitter }
    }

    /// Estimated minutes between `a` and `b`, in either direction.
    ///
    /// Results are cached under an unordered key. With jitter enabled the
    /// jittered value is what gets cached, so repeated lookups agree.
    pub async fn estimate_minutes(&self, a: Coordinate, b: Coordinate) -> u32 {
        let key = drive_time_key(a, b);
        if let Some(minutes) = self.cache.get_drive_time(&key).await {
            return minutes;
        }

        let km = haversine_distance_km(a, b);
        let minutes = match self.jitter {
            Some(jitter) => jittered(km / speed_for_distance(km) * 60.0, jitter),
            None => minutes_for_distance(km),
        };
        debug!(%key, km, minutes, "estimated drive time");

        self.cache.insert_drive_time(key, minutes).await;
        minutes
    }
}
