//! Ensemble composition: one mediator plus debate members.

use crate::core::error::DomainError;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// Which models take part in a debate and which one mediates.
///
/// # Example
///
/// ```
/// use ensemble_domain::ensemble::EnsembleSpec;
///
/// let spec = EnsembleSpec::parse("openai:gpt-4o|openai:o1|openai:gpt-4o-mini").unwrap();
/// assert_eq!(spec.mediator.as_str(), "openai:gpt-4o");
/// assert_eq!(spec.members.len(), 2);
/// assert_eq!(spec.to_string(), "openai:gpt-4o|openai:o1|openai:gpt-4o-mini");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleSpec {
    pub mediator: ModelId,
    pub members: Vec<ModelId>,
}

impl EnsembleSpec {
    pub fn new(mediator: ModelId, members: Vec<ModelId>) -> Result<Self, DomainError> {
        if members.is_empty() {
            return Err(DomainError::NoModels);
        }
        Ok(Self { mediator, members })
    }

    /// Parse the pipe-delimited `mediator|member1|member2...` form.
    ///
    /// Any blank segment or a missing member list is a validation error;
    /// nothing is dropped silently.
    pub fn parse(spec: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidEnsembleSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = spec.split('|').map(str::trim).collect();
        if parts.len() < 2 {
            return Err(invalid("needs a mediator and at least one member"));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("contains an empty model id"));
        }

        let mut ids = parts
            .into_iter()
            .map(ModelId::new)
            .collect::<Result<Vec<_>, _>>()?;
        let mediator = ids.remove(0);
        Ok(Self {
            mediator,
            members: ids,
        })
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }
}

impl std::fmt::Display for EnsembleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mediator)?;
        for member in &self.members {
            write!(f, "|{}", member)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for EnsembleSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let spec = EnsembleSpec::parse("m | a | b | a").unwrap();
        assert_eq!(spec.mediator.as_str(), "m");
        let members: Vec<_> = spec.members.iter().map(|m| m.as_str()).collect();
        assert_eq!(members, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_parse_single_segment_rejected() {
        let err = EnsembleSpec::parse("openai:gpt-4o").unwrap_err();
        assert!(matches!(err, DomainError::InvalidEnsembleSpec { .. }));
    }

    #[test]
    fn test_parse_empty_segment_rejected() {
        assert!(EnsembleSpec::parse("m||b").is_err());
        assert!(EnsembleSpec::parse("m|a|").is_err());
        assert!(EnsembleSpec::parse("|a").is_err());
    }

    #[test]
    fn test_new_requires_members() {
        let mediator = ModelId::new("m").unwrap();
        assert_eq!(
            EnsembleSpec::new(mediator, vec![]).unwrap_err(),
            DomainError::NoModels
        );
    }

    #[test]
    fn test_display_roundtrip() {
        let text = "a:x|b:y|c:z";
        assert_eq!(EnsembleSpec::parse(text).unwrap().to_string(), text);
    }
}
