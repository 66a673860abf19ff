//! Domain-level errors

use thiserror::Error;

use crate::entities::ValidationIssue;
use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside latitude/longitude range
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// A trip request failed validation
    #[error("Trip validation failed: {}", join_issues(.0))]
    TripValidation(Vec<ValidationIssue>),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Human-readable messages for each validation issue
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::TripValidation(issues) => issues.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{GeoPoint, TripField};

    #[test]
    fn trip_validation_message_lists_issues() {
        let err = DomainError::TripValidation(vec![
            ValidationIssue::CoordinatesOutOfBounds {
                field: TripField::Dropoff,
            },
            ValidationIssue::PassengerCount,
        ]);
        assert_eq!(
            err.to_string(),
            "Trip validation failed: Dropoff: coordinates out of bounds. Passengers must be ≥ 1."
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn invalid_coordinates_converts() {
        let err: DomainError = GeoPoint::new(95.0, 0.0).unwrap_err().into();
        assert!(matches!(err, DomainError::InvalidCoordinates(_)));
        assert_eq!(err.messages().len(), 1);
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("field is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: field is required");
    }
}
