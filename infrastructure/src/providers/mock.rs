//! Offline model for dry runs.

use async_trait::async_trait;
use ensemble_application::ports::llm_gateway::{GatewayError, LanguageModel};
use ensemble_domain::{GenerationOptions, Message};

/// Answers every call with a fixed text. `mock:` with an empty text echoes
/// the last message instead.
pub struct EchoModel {
    id: String,
    reply: String,
}

impl EchoModel {
    pub fn new(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self {
            id: format!("mock:{}", reply),
            reply,
        }
    }
}

#[async_trait]
impl LanguageModel for EchoModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        if self.reply.is_empty() {
            return Ok(messages.last().map(Message::text).unwrap_or_default());
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reply() {
        let model = EchoModel::new("42");
        let text = model
            .generate_text(&[Message::user("question")], &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "42");
        assert_eq!(model.id(), "mock:42");
    }

    #[tokio::test]
    async fn test_empty_reply_echoes() {
        let model = EchoModel::new("");
        let text = model
            .generate_text(
                &[Message::system("sys"), Message::user("say this back")],
                &GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(text, "say this back");
    }
}
