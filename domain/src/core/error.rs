//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No models configured for the ensemble")]
    NoModels,

    #[error("Invalid model id: {0}")]
    InvalidModel(String),

    #[error("Invalid ensemble spec '{spec}': {reason}")]
    InvalidEnsembleSpec { spec: String, reason: String },

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_ensemble_spec_display() {
        let error = DomainError::InvalidEnsembleSpec {
            spec: "a".to_string(),
            reason: "needs a mediator and at least one member".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid ensemble spec 'a': needs a mediator and at least one member"
        );
    }

    #[test]
    fn test_no_models_display() {
        assert_eq!(
            DomainError::NoModels.to_string(),
            "No models configured for the ensemble"
        );
    }
}
