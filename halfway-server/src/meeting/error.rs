//! Errors surfaced by the meeting-point pipeline.

use std::fmt;

use crate::domain::DomainError;
use crate::providers::{Provider, ProviderError};

use super::pipeline::Stage;

/// Coarse classification of a [`MeetError`], stable across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    NoRouteFound,
    ProviderError,
    /// A provider call ran out of time. A specialization of `ProviderError`.
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NoRouteFound => "no_route_found",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::Timeout => "timeout",
        })
    }
}

/// Errors from a single pipeline component.
#[derive(Debug, thiserror::Error)]
pub enum MeetError {
    /// The caller's input was empty or malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The geocoder had no match for an address
    #[error("location not found: {0}")]
    NotFound(String),

    /// The router could not connect the two points
    #[error("no route found from {origin} to {destination}")]
    NoRouteFound { origin: String, destination: String },

    /// A provider call failed after retries
    #[error("{provider} provider error: {source}")]
    Provider {
        provider: Provider,
        #[source]
        source: ProviderError,
    },
}

impl MeetError {
    pub fn provider(provider: Provider, source: ProviderError) -> Self {
        MeetError::Provider { provider, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MeetError::InvalidInput(_) => ErrorKind::InvalidInput,
            MeetError::NotFound(_) => ErrorKind::NotFound,
            MeetError::NoRouteFound { .. } => ErrorKind::NoRouteFound,
            MeetError::Provider { source, .. } if source.is_timeout() => ErrorKind::Timeout,
            MeetError::Provider { .. } => ErrorKind::ProviderError,
        }
    }

    /// A message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            MeetError::InvalidInput(_) => "Please enter two locations to find a meeting point.",
            MeetError::NotFound(_) => {
                "Couldn't find that location. Please check the address and try again."
            }
            MeetError::NoRouteFound { .. } => {
                "Couldn't find a route between these locations. Try locations that are closer together."
            }
            MeetError::Provider {
                provider: Provider::Places,
                ..
            } => "Had trouble finding places in this area. Please try again.",
            MeetError::Provider { source, .. } if source.is_timeout() => {
                "The map service took too long to respond. Please try again."
            }
            MeetError::Provider { .. } => {
                "Network error. Please check your connection and try again."
            }
        }
    }
}

impl From<DomainError> for MeetError {
    fn from(err: DomainError) -> Self {
        MeetError::InvalidInput(err.to_string())
    }
}

/// A pipeline run that stopped at `stage`.
#[derive(Debug, thiserror::Error)]
#[error("meeting-point search failed while {stage}: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: MeetError,
}

impl PipelineFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}
