//! Address to coordinate resolution with caching and retry.

use std::sync::Arc;

use tracing::debug;

use crate::cache::GeoCache;
use crate::domain::Coordinate;
use crate::providers::{GeocodingProvider, Provider, ProviderError};
use crate::retry::RetryPolicy;

use super::error::MeetError;

/// Resolves free-text addresses through a [`GeocodingProvider`].
pub struct Geocoder<G> {
    provider: G,
    cache: Arc<GeoCache>,
    retry: RetryPolicy,
}

impl<G: GeocodingProvider> Geocoder<G> {
    pub fn new(provider: G, cache: Arc<GeoCache>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            cache,
            retry,
        }
    }

    /// Resolve `address` to a coordinate.
    ///
    /// The address is trimmed before use; that trimmed form is the cache key.
    /// A `"lat, lng"` literal resolves directly without touching the
    /// provider or the cache. Only transient provider errors are retried.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate, MeetError> {
        let normalized = address.trim();
        if normalized.is_empty() {
            return Err(MeetError::InvalidInput("address is empty".to_string()));
        }

        if let Some(literal) = Coordinate::parse_literal(normalized) {
            debug!(address = normalized, "address is a coordinate literal");
            return Ok(literal);
        }

        if let Some(cached) = self.cache.get_geocode(normalized).await {
            debug!(address = normalized, "geocode cache hit");
            return Ok(cached);
        }
        debug!(address = normalized, "geocode cache miss");

        let hits = self
            .retry
            .run(ProviderError::is_transient, || self.provider.search(normalized))
            .await
            .map_err(|e| MeetError::provider(Provider::Geocoding, e))?;

        let best = hits
            .into_iter()
            .next()
            .ok_or_else(|| MeetError::NotFound(normalized.to_string()))?;

        self.cache
            .insert_geocode(normalized.to_string(), best.location)
            .await;

        Ok(best.location)
    }
}
