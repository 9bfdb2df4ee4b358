//! Meeting-point planner.
//!
//! This module answers: "We are starting from these two addresses - where
//! along the drive between us should we meet, and at which place?"
//!
//! The pipeline geocodes both addresses, resolves a main and an alternate
//! driving route, takes the distance-weighted halfway point of each, and
//! ranks the places around those points by combined drive time.

mod config;
mod cost;
mod drive_time;
mod error;
mod geocoder;
mod midpoint;
mod pipeline;
mod places;
mod rank;
mod routes;

pub use config::MeetingConfig;
pub use cost::RouteCost;
pub use drive_time::{DriveTimeEstimator, minutes_for_distance, speed_for_distance};
pub use error::{ErrorKind, MeetError, PipelineFailure};
pub use geocoder::Geocoder;
pub use midpoint::{Midpoint, compute_midpoint, cumulative_distances, midpoint_along};
pub use pipeline::{MeetingPoint, Pipeline, Stage};
pub use places::{PoiSearch, PoiSearchRequest, format_address};
pub use rank::{dedupe, merge, rank_and_limit, rank_candidates};
pub use routes::{RouteResolver, resample};
