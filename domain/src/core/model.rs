//! Model identifiers and capability tiers

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Identifier of a model (Value Object)
///
/// Ids follow the `provider:model` convention (`openai:gpt-4o`,
/// `moa:openai:gpt-4o|openai:gpt-4o-mini`). Everything up to the first `:`
/// is the provider; the remainder is handed to that provider untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(String);

impl ModelId {
    /// Create a model id, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModel("model id cannot be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider prefix (`openai` for `openai:gpt-4o`), if any.
    pub fn provider(&self) -> Option<&str> {
        self.0.split_once(':').map(|(provider, _)| provider)
    }

    /// Model name without the provider prefix.
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(_, name)| name)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Capability tier of a model exposed by the run context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Easy => "easy",
            ModelTier::Medium => "medium",
            ModelTier::Hard => "hard",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(ModelTier::Easy),
            "medium" => Ok(ModelTier::Medium),
            "hard" => Ok(ModelTier::Hard),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown model tier '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_provider_split() {
        let id: ModelId = "openai:gpt-4o".parse().unwrap();
        assert_eq!(id.provider(), Some("openai"));
        assert_eq!(id.name(), "gpt-4o");
    }

    #[test]
    fn test_model_id_nested_colons() {
        let id: ModelId = "moa:openai:gpt-4o|openai:o1".parse().unwrap();
        assert_eq!(id.provider(), Some("moa"));
        assert_eq!(id.name(), "openai:gpt-4o|openai:o1");
    }

    #[test]
    fn test_model_id_without_provider() {
        let id = ModelId::new("local-model").unwrap();
        assert_eq!(id.provider(), None);
        assert_eq!(id.name(), "local-model");
    }

    #[test]
    fn test_model_id_rejects_blank() {
        assert!(ModelId::new("   ").is_err());
    }

    #[test]
    fn test_model_id_serde_roundtrip() {
        let id = ModelId::new("openai:gpt-4o").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"openai:gpt-4o\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("HARD".parse::<ModelTier>().unwrap(), ModelTier::Hard);
        assert!("extreme".parse::<ModelTier>().is_err());
        assert_eq!(ModelTier::default(), ModelTier::Medium);
    }
}
