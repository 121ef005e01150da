//! Language model port
//!
//! Defines the single capability every orchestration strategy is built on:
//! turn a transcript into text. Strategies that combine several models
//! implement the same trait, so they nest freely.

use async_trait::async_trait;
use ensemble_domain::core::string::truncate;
use ensemble_domain::{GenerationOptions, Message, extract_json};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur during model calls
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Model not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Could not parse model output: {0}")]
    Parse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// A text generation capability
///
/// Provider adapters live in the infrastructure layer. Debate and best-of-N
/// strategies wrap their use cases in this trait as well.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier used in logs, cost accounting and the registry.
    fn id(&self) -> &str;

    /// Whether the model can be called (credentials present etc.).
    fn is_configured(&self) -> bool {
        true
    }

    /// Generate a completion for the transcript.
    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError>;
}

/// Conveniences available on every [`LanguageModel`].
#[async_trait]
pub trait LanguageModelExt: LanguageModel {
    /// Generate and parse the JSON document embedded in the response.
    async fn generate_json<T>(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Send,
    {
        let text = self.generate_text(messages, options).await?;
        parse_json(&text)
    }
}

impl<M: LanguageModel + ?Sized> LanguageModelExt for M {}

/// Parse the JSON payload of a model response.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    serde_json::from_str(extract_json(text))
        .map_err(|e| GatewayError::Parse(format!("{} in {:?}", e, truncate(text, 200))))
}
