use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use halfway_server::cache::GeoCache;
use halfway_server::config::ServerConfig;
use halfway_server::meeting::Pipeline;
use halfway_server::providers::{NominatimClient, OsrmClient, OverpassClient};
use halfway_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("halfway_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Create provider clients
    let nominatim =
        NominatimClient::new(config.nominatim.clone()).expect("Failed to create Nominatim client");
    let osrm = OsrmClient::new(config.osrm.clone()).expect("Failed to create OSRM client");
    let overpass =
        OverpassClient::new(config.overpass.clone()).expect("Failed to create Overpass client");

    // One cache shared by every request
    let cache = Arc::new(GeoCache::new(&config.cache));

    let pipeline = Pipeline::new(nominatim, osrm, overpass, cache, config.meeting.clone());
    let app = create_router(AppState::new(pipeline));

    let addr = config.bind_addr;
    info!(%addr, "meeting-point planner listening");
    info!("  GET  /health             - Health check");
    info!("  POST /api/meet           - Find a meeting point");
    info!("  GET  /api/geocode        - Geocode an address");
    info!("  GET  /api/places/nearby  - Places around a point");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
