//! Application state for the web layer.

use std::sync::Arc;

use crate::meeting::Pipeline;
use crate::providers::{NominatimClient, OsrmClient, OverpassClient};

/// The pipeline wired to the public OpenStreetMap services.
pub type LivePipeline = Pipeline<NominatimClient, OsrmClient, OverpassClient>;

/// Shared application state.
///
/// Generic over the pipeline's providers so the router can be exercised
/// with in-memory mocks.
pub struct AppState<G, R, P> {
    /// Meeting-point pipeline, shared across requests
    pub pipeline: Arc<Pipeline<G, R, P>>,
}

impl<G, R, P> AppState<G, R, P> {
    /// Create a new app state.
    pub fn new(pipeline: Pipeline<G, R, P>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

// Derived Clone would require the providers themselves to be Clone
impl<G, R, P> Clone for AppState<G, R, P> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}
