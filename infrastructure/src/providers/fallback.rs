//! Ordered fallback over several models.

use async_trait::async_trait;
use ensemble_application::ports::llm_gateway::{GatewayError, LanguageModel};
use ensemble_domain::{GenerationOptions, Message};
use std::sync::Arc;
use tracing::warn;

/// Tries each model in order and returns the first success.
///
/// Fails with the last model's error when every model fails.
pub struct FallbackModel {
    id: String,
    models: Vec<Arc<dyn LanguageModel>>,
}

impl FallbackModel {
    pub fn new(models: Vec<Arc<dyn LanguageModel>>) -> Result<Self, GatewayError> {
        if models.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "fallback chain needs at least one model".to_string(),
            ));
        }
        let id = format!(
            "fallback:{}",
            models.iter().map(|m| m.id()).collect::<Vec<_>>().join("|")
        );
        Ok(Self { id, models })
    }
}

#[async_trait]
impl LanguageModel for FallbackModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_configured(&self) -> bool {
        self.models.iter().any(|m| m.is_configured())
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let mut last_error = None;
        for model in &self.models {
            match model.generate_text(messages, options).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("{} failed, trying next model: {}", model.id(), e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| GatewayError::Other("empty fallback chain".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::EchoModel;

    struct Failing(&'static str);

    #[async_trait]
    impl LanguageModel for Failing {
        fn id(&self) -> &str {
            self.0
        }

        fn is_configured(&self) -> bool {
            false
        }

        async fn generate_text(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<String, GatewayError> {
            Err(GatewayError::ConnectionError(format!("{} down", self.0)))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = FallbackModel::new(vec![
            Arc::new(Failing("a:x")),
            Arc::new(EchoModel::new("second")),
            Arc::new(EchoModel::new("third")),
        ])
        .unwrap();

        let text = chain
            .generate_text(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "second");
        assert_eq!(chain.id(), "fallback:a:x|mock:second|mock:third");
        assert!(chain.is_configured());
    }

    #[tokio::test]
    async fn test_all_fail_returns_last_error() {
        let chain =
            FallbackModel::new(vec![Arc::new(Failing("a:x")), Arc::new(Failing("b:y"))]).unwrap();

        let err = chain
            .generate_text(&[Message::user("hi")], &GenerationOptions::default())
            .await
            .unwrap_err();
        match err {
            GatewayError::ConnectionError(msg) => assert_eq!(msg, "b:y down"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!chain.is_configured());
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(FallbackModel::new(vec![]).is_err());
    }
}
