//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from provider/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A route needs at least two points
    #[error("route must have at least 2 points, got {0}")]
    DegenerateRoute(usize),

    /// Bounding box over nothing
    #[error("cannot compute bounds of an empty point set")]
    EmptyPointSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::DegenerateRoute(1);
        assert_eq!(err.to_string(), "route must have at least 2 points, got 1");

        let err = DomainError::EmptyPointSet;
        assert_eq!(
            err.to_string(),
            "cannot compute bounds of an empty point set"
        );
    }
}
