//! OSRM routing client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::domain::Coordinate;

use super::RoutingProvider;
use super::error::ProviderError;
use super::types::{OsrmResponse, ProviderRoute};

/// Default base URL for the OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

const DEFAULT_PROFILE: &str = "driving";

const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    /// Routing profile segment of the URL (`driving`, `car`, ...).
    pub profile: String,
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 15,
        }
    }
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
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

/// OSRM `/route/v1` client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            origin.lng(),
            origin.lat(),
            destination.lng(),
            destination.lat()
        )
    }
}

impl RoutingProvider for OsrmClient {
    /// Fetch the route and any alternatives, fastest first.
    ///
    /// An empty list means OSRM found no road connecting the points.
    async fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<ProviderRoute>, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(self.route_url(origin, destination))
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
            ])
            .send()
            .await?;

        let status = response.status();

        // OSRM reports unroutable points as 400 with a JSON code
        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<OsrmResponse>(&body) {
                Ok(parsed) if parsed.is_no_route() => Ok(Vec::new()),
                Ok(parsed) => Err(ProviderError::BadRequest(
                    parsed.message.unwrap_or(parsed.code),
                )),
                Err(_) => Err(ProviderError::BadRequest(body)),
            };
        }

        if !status.is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let body = response.text().await?;

        let parsed: OsrmResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(e, &body))?;

        if parsed.is_no_route() {
            return Ok(Vec::new());
        }
        if parsed.code != "Ok" {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: parsed.message.unwrap_or(parsed.code),
            });
        }

        parsed
            .routes
            .iter()
            .map(|r| {
                r.to_provider_route().ok_or_else(|| ProviderError::Json {
                    message: "route geometry contains an out-of-range position".to_string(),
                    body: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.profile, "driving");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn route_url_uses_lng_lat_order() {
        let client = OsrmClient::new(
            OsrmConfig::new()
                .with_base_url("http://osrm.local/")
                .with_profile("car"),
        )
        .unwrap();
        let url = client.route_url(
            Coordinate::new(40.5, -75.25).unwrap(),
            Coordinate::new(41.0, -74.0).unwrap(),
        );
        assert_eq!(url, "http://osrm.local/route/v1/car/-75.25,40.5;-74,41");
    }
}
