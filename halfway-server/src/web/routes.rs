//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Category, Coordinate, RouteKind};
use crate::meeting::{ErrorKind, MeetError, PipelineFailure};
use crate::providers::{GeocodingProvider, PlacesProvider, RoutingProvider};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<G, R, P>(state: AppState<G, R, P>) -> Router
where
    G: GeocodingProvider + 'static,
    R: RoutingProvider + 'static,
    P: PlacesProvider + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/meet", post(find_meeting_point::<G, R, P>))
        .route("/api/geocode", get(geocode::<G, R, P>))
        .route("/api/places/nearby", get(nearby_places::<G, R, P>))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors())
        .with_state(state)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Find a meeting point between two locations.
async fn find_meeting_point<G, R, P>(
    State(state): State<AppState<G, R, P>>,
    body: Bytes,
) -> Result<Json<MeetResponse>, AppError>
where
    G: GeocodingProvider,
    R: RoutingProvider,
    P: PlacesProvider,
{
    // Parse JSON manually so we can log the body on failure
    let req: MeetRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid meet request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let point = state
        .pipeline
        .find_meeting_point(&req.location1, &req.location2)
        .await?;

    Ok(Json(MeetResponse::from_meeting_point(&point)))
}

/// Resolve a single address.
async fn geocode<G, R, P>(
    State(state): State<AppState<G, R, P>>,
    query: Result<Query<GeocodeRequest>, QueryRejection>,
) -> Result<Json<GeocodeResponse>, AppError>
where
    G: GeocodingProvider,
    R: RoutingProvider,
    P: PlacesProvider,
{
    let req = query_params(query)?;
    let location = state.pipeline.geocoder().geocode(&req.q).await?;

    Ok(Json(GeocodeResponse {
        query: req.q.trim().to_string(),
        location,
    }))
}

/// Search places around an explicit centre.
async fn nearby_places<G, R, P>(
    State(state): State<AppState<G, R, P>>,
    query: Result<Query<NearbyRequest>, QueryRejection>,
) -> Result<Json<NearbyResponse>, AppError>
where
    G: GeocodingProvider,
    R: RoutingProvider,
    P: PlacesProvider,
{
    let req = query_params(query)?;
    let center = Coordinate::new(req.lat, req.lng).map_err(|e| AppError::BadRequest {
        message: format!("Invalid centre: {e}"),
    })?;
    let origin1 = optional_point(req.lat1, req.lng1, "origin 1")?.unwrap_or(center);
    let origin2 = optional_point(req.lat2, req.lng2, "origin 2")?.unwrap_or(center);

    let mut search = state
        .pipeline
        .poi_request(center, origin1, origin2, RouteKind::Main);

    if let Some(radius) = req.radius {
        if radius == 0 {
            return Err(AppError::BadRequest {
                message: "Radius must be positive".to_string(),
            });
        }
        search.radius_m = radius;
    }

    if let Some(categories) = req.categories.as_deref().filter(|c| !c.trim().is_empty()) {
        search.categories = parse_categories(categories)?;
    }

    let places = state.pipeline.places().search_pois(&search).await?;

    Ok(Json(NearbyResponse {
        center,
        places: places.iter().map(PlaceResult::from_candidate).collect(),
    }))
}

/// Unwrap query parameters, turning extractor failures into JSON errors.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query.map(|Query(params)| params).map_err(|e| {
        warn!(error = %e, "invalid query string");
        AppError::BadRequest {
            message: format!("Invalid query: {}", e.body_text()),
        }
    })
}

/// A coordinate from an optional lat/lng pair. Both or neither must be given.
fn optional_point(
    lat: Option<f64>,
    lng: Option<f64>,
    what: &str,
) -> Result<Option<Coordinate>, AppError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng)
            .map(Some)
            .map_err(|e| AppError::BadRequest {
                message: format!("Invalid {what}: {e}"),
            }),
        _ => Err(AppError::BadRequest {
            message: format!("Invalid {what}: latitude and longitude must be given together"),
        }),
    }
}

fn parse_categories(list: &str) -> Result<Vec<Category>, AppError> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Category>().map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })
        })
        .collect()
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::NoRouteFound => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ProviderError => StatusCode::BAD_GATEWAY,
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Meet(#[from] MeetError),

    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest { .. } => ErrorKind::InvalidInput,
            AppError::Meet(e) => e.kind(),
            AppError::Pipeline(f) => f.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::BadRequest { message } => ErrorResponse {
                error: message.clone(),
                kind: self.kind().to_string(),
                stage: None,
            },
            AppError::Meet(e) => ErrorResponse {
                error: e.user_message().to_string(),
                kind: e.kind().to_string(),
                stage: None,
            },
            AppError::Pipeline(f) => ErrorResponse {
                error: f.error.user_message().to_string(),
                kind: f.kind().to_string(),
                stage: Some(f.stage.to_string()),
            },
        };

        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
