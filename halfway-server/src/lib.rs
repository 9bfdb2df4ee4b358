//! Meeting-point planner server.
//!
//! A web application that answers: "We're starting from these two places,
//! where along the drive between us should we meet?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod geo;
pub mod meeting;
pub mod providers;
pub mod retry;
pub mod web;
