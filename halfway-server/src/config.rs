//! Server configuration from environment variables.

use std::env::VarError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::meeting::MeetingConfig;
use crate::providers::{NominatimConfig, OsrmConfig, OverpassConfig};

/// Listen address when `HALFWAY_BIND` is unset or blank.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Error loading the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub nominatim: NominatimConfig,
    pub osrm: OsrmConfig,
    pub overpass: OverpassConfig,
    pub cache: CacheConfig,
    pub meeting: MeetingConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Every variable is optional:
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HALFWAY_BIND` | `127.0.0.1:3000` |
    /// | `NOMINATIM_URL` | public Nominatim |
    /// | `NOMINATIM_USER_AGENT` | `halfway-server/<version>` |
    /// | `GEOCODE_COUNTRY` | unrestricted |
    /// | `OSRM_URL` | public OSRM demo server |
    /// | `OVERPASS_URL` | public Overpass interpreter |
    /// | `CACHE_TTL_SECS` | 3600 |
    /// | `SEARCH_RADIUS_M` | 2000 |
    /// | `POI_LIMIT` | 20 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let var = |key: &str| lookup(key).ok().filter(|v| !v.trim().is_empty());

        fn parse<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
        {
            raw.map(|v| {
                v.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: key.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
        }

        let bind_addr = var("HALFWAY_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "HALFWAY_BIND".to_string(),
                reason: e.to_string(),
            })?;

        let mut nominatim = NominatimConfig::new();
        if let Some(url) = var("NOMINATIM_URL") {
            nominatim = nominatim.with_base_url(url);
        }
        if let Some(agent) = var("NOMINATIM_USER_AGENT") {
            nominatim = nominatim.with_user_agent(agent);
        }
        if let Some(codes) = var("GEOCODE_COUNTRY") {
            nominatim = nominatim.with_country_codes(codes);
        }

        let mut osrm = OsrmConfig::new();
        if let Some(url) = var("OSRM_URL") {
            osrm = osrm.with_base_url(url);
        }

        let mut overpass = OverpassConfig::new();
        if let Some(url) = var("OVERPASS_URL") {
            overpass = overpass.with_base_url(url);
        }

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse::<u64>("CACHE_TTL_SECS", var("CACHE_TTL_SECS"))? {
            cache.ttl = Duration::from_secs(secs);
        }

        let mut meeting = MeetingConfig::default();
        if let Some(radius) = parse::<u32>("SEARCH_RADIUS_M", var("SEARCH_RADIUS_M"))? {
            if radius == 0 {
                return Err(ConfigError::InvalidEnvVar {
                    var: "SEARCH_RADIUS_M".to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            meeting = meeting.with_search_radius(radius);
        }
        if let Some(limit) = parse::<usize>("POI_LIMIT", var("POI_LIMIT"))? {
            meeting = meeting.with_poi_limit(limit);
        }

        Ok(Self {
            bind_addr,
            nominatim,
            osrm,
            overpass,
            cache,
            meeting,
        })
    }
}
