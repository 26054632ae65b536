pub mod classifier;
pub mod client;
pub mod database;
pub mod ingest;
pub mod memory;
pub mod naming;
pub mod sanitizer;
pub mod validation;

use database::DatabaseError;
use validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error("could not persist mission: {0}")]
    Persistence(#[from] DatabaseError),
}

impl IngestError {
    /// Validation failures will fail again, storage failures might not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_persistence_errors_are_retryable() {
        let validation = IngestError::from(ValidationError::MissingField("distanceKm"));
        assert!(!validation.is_retryable());
        assert_eq!(validation.reason_code(), "VALIDATION_ERROR");
        assert_eq!(
            validation.to_string(),
            "invalid submission: missing required field `distanceKm`"
        );

        let persistence = IngestError::from(DatabaseError::NotFound);
        assert!(persistence.is_retryable());
        assert_eq!(persistence.reason_code(), "PERSISTENCE_ERROR");
    }
}
