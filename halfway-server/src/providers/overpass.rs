//! Overpass API places client.
//!
//! Queries are written in Overpass QL: one `node` and one `way` statement per
//! category tag filter, unioned, with `out center` so ways come back with a
//! representative point.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::domain::Category;

use super::PlacesProvider;
use super::error::ProviderError;
use super::types::{OverpassResponse, PlaceElement, PlacesQuery};

/// Default interpreter endpoint.
const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Full interpreter URL.
    pub base_url: String,
    pub max_concurrent: usize,
    /// Request timeout in seconds. Also sent as the server-side query timeout.
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 25,
        }
    }
}

impl OverpassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Build the Overpass QL for a radius search.
///
/// An empty category list searches every searchable category. Categories
/// are emitted in [`Category::SEARCHABLE`] order regardless of input order.
pub fn build_query(query: &PlacesQuery, timeout_secs: u64) -> String {
    let around = format!(
        "(around:{},{},{})",
        query.radius_m,
        query.center.lat(),
        query.center.lng()
    );

    let mut ql = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    for category in Category::SEARCHABLE {
        if !query.categories.is_empty() && !query.categories.contains(&category) {
            continue;
        }
        let Some((key, values)) = category.tag_filter() else {
            continue;
        };
        let filter = match values {
            [single] => format!("[\"{key}\"=\"{single}\"]"),
            many => format!("[\"{key}\"~\"^({})$\"]", many.join("|")),
        };
        for element in ["node", "way"] {
            // Writing to a String cannot fail
            let _ = writeln!(ql, "  {element}{filter}{around};");
        }
    }
    let _ = write!(ql, ");\nout center {};", query.limit);
    ql
}

/// Overpass interpreter client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
    semaphore: Arc<Semaphore>,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            timeout_secs: config.timeout_secs,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }
}

impl PlacesProvider for OverpassClient {
    async fn nearby(&self, query: &PlacesQuery) -> Result<Vec<PlaceElement>, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let ql = build_query(query, self.timeout_secs);
        tracing::debug!(query = %ql, "overpass query");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("data", ql.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let body = response.text().await?;

        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(e, &body))?;

        Ok(parsed.elements.into_iter().map(PlaceElement::from).collect())
    }
}
