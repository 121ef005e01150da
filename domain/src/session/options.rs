//! Generation options passed opaquely to a model

use serde::{Deserialize, Serialize};

/// Per-call generation settings.
///
/// Orchestration strategies only ever override `temperature` and
/// `max_output_tokens`; `id` is a tracing label that shows up in logs and
/// the conversation log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Label used in logs, `"-"` when none was given.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_keep_id() {
        let base = GenerationOptions::new().with_id("debate");
        let opts = base.clone().with_temperature(0.8).with_max_output_tokens(512);
        assert_eq!(opts.temperature, Some(0.8));
        assert_eq!(opts.max_output_tokens, Some(512));
        assert_eq!(opts.label(), "debate");
        assert_eq!(GenerationOptions::default().label(), "-");
    }
}
