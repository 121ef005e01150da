//! Metering decorator for language models.

use super::usage::UsageTracker;
use crate::config::ModelPricing;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::{GatewayError, LanguageModel};
use async_trait::async_trait;
use ensemble_domain::core::string::truncate;
use ensemble_domain::{GenerationOptions, Message};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const PREVIEW_LEN: usize = 200;

/// Wraps a model and attributes every call to the run that owns it.
///
/// Each call updates the run's [`UsageTracker`] and emits one
/// `llm_call` (or `llm_call_failed`) conversation event.
pub struct MeteredModel {
    inner: Arc<dyn LanguageModel>,
    run_id: String,
    pricing: ModelPricing,
    usage: Arc<UsageTracker>,
    logger: Arc<dyn ConversationLogger>,
}

impl MeteredModel {
    pub fn new(
        inner: Arc<dyn LanguageModel>,
        run_id: impl Into<String>,
        pricing: ModelPricing,
        usage: Arc<UsageTracker>,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            inner,
            run_id: run_id.into(),
            pricing,
            usage,
            logger,
        }
    }
}

#[async_trait]
impl LanguageModel for MeteredModel {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let chars_in: usize = messages.iter().map(|m| m.content.char_count()).sum();
        let started = Instant::now();

        let result = self.inner.generate_text(messages, options).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(text) => {
                let chars_out = text.chars().count();
                let cost = self.pricing.cost(chars_in, chars_out);
                self.usage.record_success(chars_in, chars_out, cost);
                debug!(
                    "{} [{}] {} chars in, {} chars out, {}ms",
                    self.inner.id(),
                    options.label(),
                    chars_in,
                    chars_out,
                    duration_ms
                );
                self.logger.log(ConversationEvent::new(
                    "llm_call",
                    json!({
                        "run_id": self.run_id,
                        "model": self.inner.id(),
                        "label": options.label(),
                        "temperature": options.temperature,
                        "messages": messages.len(),
                        "chars_in": chars_in,
                        "chars_out": chars_out,
                        "cost": cost,
                        "duration_ms": duration_ms,
                        "response_preview": truncate(text, PREVIEW_LEN),
                    }),
                ));
            }
            Err(e) => {
                self.usage.record_failure(chars_in);
                warn!("{} [{}] failed: {}", self.inner.id(), options.label(), e);
                self.logger.log(ConversationEvent::new(
                    "llm_call_failed",
                    json!({
                        "run_id": self.run_id,
                        "model": self.inner.id(),
                        "label": options.label(),
                        "chars_in": chars_in,
                        "duration_ms": duration_ms,
                        "error": e.to_string(),
                    }),
                ));
            }
        }

        result
    }
}
