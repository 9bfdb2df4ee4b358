//! Tuning parameters for the meeting-point pipeline.

use crate::domain::Category;
use crate::geo::DEFAULT_BOUNDS_PADDING;
use crate::retry::RetryPolicy;

/// Configuration parameters for a meeting-point search.
#[derive(Debug, Clone)]
pub struct MeetingConfig {
    /// Radius of the place search around each midpoint (metres).
    pub search_radius_m: u32,

    /// Maximum number of places to return per midpoint.
    pub poi_limit: usize,

    /// Categories to search for. Empty means every searchable category.
    pub categories: Vec<Category>,

    /// Padding of the result's map bounds, as a fraction of each axis' range.
    pub bounds_padding: f64,

    /// Fuel price used for the route cost estimate (currency per US gallon).
    pub fuel_price_per_gallon: f64,

    /// Relative jitter applied to drive-time estimates, e.g. `0.1` for ±10%.
    /// `None` keeps estimates deterministic.
    pub drive_time_jitter: Option<f64>,

    /// Back-off schedule for every provider call.
    pub retry: RetryPolicy,
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            search_radius_m: 2000,
            poi_limit: 20,
            categories: Category::SEARCHABLE.to_vec(),
            bounds_padding: DEFAULT_BOUNDS_PADDING,
            fuel_price_per_gallon: 3.50,
            drive_time_jitter: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl MeetingConfig {
    pub fn with_search_radius(mut self, metres: u32) -> Self {
        self.search_radius_m = metres;
        self
    }

    pub fn with_poi_limit(mut self, limit: usize) -> Self {
        self.poi_limit = limit;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_drive_time_jitter(mut self, jitter: f64) -> Self {
        self.drive_time_jitter = Some(jitter);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
