//! Nominatim geocoding client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use super::error::ProviderError;
use super::types::{GeocodeHit, NominatimPlace};
use super::GeocodingProvider;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying User-Agent.
const DEFAULT_USER_AGENT: &str = concat!("halfway-server/", env!("CARGO_PKG_VERSION"));

/// The public instance allows one request per second; stay close to that.
const DEFAULT_MAX_CONCURRENT: usize = 2;

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Comma-separated ISO 3166-1 codes restricting results, e.g. `"us,ca"`.
    pub country_codes: Option<String>,
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

impl NominatimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn with_country_codes(mut self, codes: impl Into<String>) -> Self {
        self.country_codes = Some(codes.into());
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

/// Nominatim `/search` client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    country_codes: Option<String>,
    semaphore: Arc<Semaphore>,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country_codes: config.country_codes,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }
}

impl GeocodingProvider for NominatimClient {
    /// Look up a free-text address. Returns at most one candidate.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeHit>, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/search", self.base_url);

        let mut params = vec![("q", query), ("format", "json"), ("limit", "1")];
        if let Some(codes) = &self.country_codes {
            params.push(("countrycodes", codes.as_str()));
        }

        let response = self.http.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let body = response.text().await?;

        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(e, &body))?;

        Ok(places.iter().filter_map(NominatimPlace::to_hit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = NominatimConfig::new()
            .with_base_url("http://localhost:8080")
            .with_user_agent("test-agent")
            .with_country_codes("gb")
            .with_max_concurrent(4)
            .with_timeout(3);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.country_codes.as_deref(), Some("gb"));
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn config_defaults() {
        let config = NominatimConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.starts_with("halfway-server/"));
        assert_eq!(config.country_codes, None);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn client_creation_strips_trailing_slash() {
        let client =
            NominatimClient::new(NominatimConfig::new().with_base_url("http://localhost/")).unwrap();
        assert_eq!(client.base_url, "http://localhost");
    }
}
