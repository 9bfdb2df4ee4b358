//! Web layer for the meeting-point planner.
//!
//! Provides HTTP endpoints for finding meeting points, geocoding addresses
//! and searching places.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, LivePipeline};
