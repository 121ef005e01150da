//! Hand-written model mocks shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, LanguageModel};
use async_trait::async_trait;
use ensemble_domain::{GenerationOptions, Message};
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&[Message], &GenerationOptions) -> Result<String, GatewayError> + Send + Sync>;

/// A call as seen by a mock.
#[derive(Debug, Clone)]
pub struct Request {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

impl Request {
    pub fn last_text(&self) -> String {
        self.messages.last().map(|m| m.text()).unwrap_or_default()
    }
}

/// Answers each call with a closure over the request. Deterministic under
/// concurrency, since the answer depends only on the prompt.
pub struct ScriptedModel {
    id: String,
    respond: Responder,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedModel {
    pub fn new<F>(id: &str, respond: F) -> Self
    where
        F: Fn(&[Message], &GenerationOptions) -> Result<String, GatewayError> + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text.
    pub fn constant(id: &str, text: &'static str) -> Self {
        Self::new(id, move |_, _| Ok(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(Request {
            messages: messages.to_vec(),
            options: options.clone(),
        });
        (self.respond)(messages, options)
    }
}

/// Pops one queued response per call; for strictly sequential flows.
pub struct QueueModel {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    requests: Mutex<Vec<Request>>,
}

impl QueueModel {
    pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for QueueModel {
    fn id(&self) -> &str {
        "mock:queue"
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(Request {
            messages: messages.to_vec(),
            options: options.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("response queue exhausted".into())))
    }
}
