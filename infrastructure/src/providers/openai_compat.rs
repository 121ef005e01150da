//! OpenAI-compatible chat-completions adapter.
//!
//! Works against any endpoint that speaks the `/chat/completions` shape
//! (OpenAI, Azure-style proxies, Ollama, vLLM, LM Studio).

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use ensemble_application::ports::llm_gateway::{GatewayError, LanguageModel};
use ensemble_domain::{Content, ContentPart, GenerationOptions, Message};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: ChatContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent<'a> {
    Text(&'a str),
    Parts(Vec<ChatPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ChatPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let content = match &message.content {
            Content::Text(text) => ChatContent::Text(text),
            Content::Parts(parts) => ChatContent::Parts(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => ChatPart::Text { text },
                        ContentPart::Image { url } => ChatPart::ImageUrl {
                            image_url: ImageUrl { url },
                        },
                    })
                    .collect(),
            ),
        };
        Self {
            role: message.role.as_str(),
            content,
        }
    }
}

fn first_choice(response: ChatResponse) -> Result<String, GatewayError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GatewayError::Parse("response has no message content".to_string()))
}

/// A single model served by an OpenAI-compatible endpoint.
pub struct OpenAiCompatibleModel {
    /// Full `provider:model` id
    id: String,
    /// Model name sent on the wire
    model: String,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    default_max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiCompatibleModel {
    pub fn new(
        provider: &str,
        model: &str,
        config: &FileProviderConfig,
        client: reqwest::Client,
    ) -> Self {
        Self {
            id: format!("{}:{}", provider, model),
            model: model.to_string(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.resolve_api_key(),
            timeout: Duration::from_secs(config.timeout_seconds),
            default_max_tokens: config.max_tokens,
            client,
        }
    }

    fn request<'a>(
        &'a self,
        messages: &'a [Message],
        options: &GenerationOptions,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: messages.iter().map(ChatMessage::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_output_tokens.or(self.default_max_tokens),
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<String, GatewayError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::ModelNotAvailable(self.id.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{} returned {}: {}",
                self.endpoint, status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;
        first_choice(parsed)
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        if messages.is_empty() {
            return Err(GatewayError::InvalidRequest("no messages".to_string()));
        }

        let body = self.request(messages, options);
        debug!(
            "POST {} model={} messages={} label={}",
            self.endpoint,
            self.model,
            messages.len(),
            options.label()
        );

        match tokio::time::timeout(self.timeout, self.send(&body)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.timeout.as_secs())),
        }
    }
}
