//! Domain types for the meeting-point planner.
//!
//! This module contains the core value types: coordinates, routes, place
//! categories and candidate places. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod category;
mod coordinate;
mod error;
mod place;
mod route;

pub use category::{Category, UnknownCategory, classify};
pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use place::{DriveTimeClass, MapLinks, PoiCandidate, UNKNOWN_ADDRESS};
pub use route::{Route, RouteKind};
