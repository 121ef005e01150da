//! Conversation transcript builder

use super::entities::{Message, Role};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Ordered, role-tagged message sequence.
///
/// A transcript is owned by the engine processing one request and only
/// grows during a run. Branches that need a variant (debate rounds, plan
/// attempts) work on clones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript holding a single user prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt.into())],
        }
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Builder: prepend a system prompt.
    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.messages
            .insert(0, Message::system(system_prompt.into()));
        self
    }

    /// Builder: append a user turn.
    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.push_user(content);
        self
    }

    /// Builder: append an assistant turn.
    pub fn with_assistant(mut self, content: impl Into<String>) -> Self {
        self.push_assistant(content);
        self
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content.into()));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content.into()));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the final message, which must be a user turn.
    ///
    /// Orchestration strategies rewrite this message, so a transcript that
    /// does not end with the user's request is rejected.
    pub fn last_user_text(&self) -> Result<String, DomainError> {
        match self.messages.last() {
            Some(message) if message.role == Role::User => Ok(message.text()),
            Some(message) => Err(DomainError::InvalidTask(format!(
                "transcript must end with a user message, found {}",
                message.role.as_str()
            ))),
            None => Err(DomainError::InvalidTask("transcript is empty".into())),
        }
    }

    /// Copy of this transcript with the final user message replaced.
    pub fn with_last_user_replaced(&self, content: impl Into<String>) -> Result<Self, DomainError> {
        self.last_user_text()?;
        let mut messages = self.messages.clone();
        if let Some(last) = messages.last_mut() {
            *last = Message::user(content.into());
        }
        Ok(Self { messages })
    }

    /// Total characters across all messages (used for cost accounting).
    pub fn char_count(&self) -> usize {
        self.messages.iter().map(|m| m.content.char_count()).sum()
    }
}

impl From<&str> for Transcript {
    fn from(prompt: &str) -> Self {
        Transcript::from_prompt(prompt)
    }
}

impl From<String> for Transcript {
    fn from(prompt: String) -> Self {
        Transcript::from_prompt(prompt)
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Transcript::from_messages(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_prompt() {
        let transcript = Transcript::from_prompt("What is Rust?");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last_user_text().unwrap(), "What is Rust?");
    }

    #[test]
    fn test_with_system_is_first() {
        let transcript = Transcript::from_prompt("q").with_system("be brief");
        assert_eq!(transcript.messages()[0].role, Role::System);
        assert_eq!(transcript.messages()[1].role, Role::User);
    }

    #[test]
    fn test_last_user_text_rejects_assistant_tail() {
        let transcript = Transcript::from_prompt("q").with_assistant("a");
        assert!(matches!(
            transcript.last_user_text(),
            Err(DomainError::InvalidTask(_))
        ));
    }

    #[test]
    fn test_last_user_text_rejects_empty() {
        assert!(Transcript::new().last_user_text().is_err());
    }

    #[test]
    fn test_replace_last_user_leaves_original_untouched() {
        let original = Transcript::from_prompt("first")
            .with_assistant("answer")
            .with_user("second");
        let replaced = original.with_last_user_replaced("rewritten").unwrap();

        assert_eq!(original.last_user_text().unwrap(), "second");
        assert_eq!(replaced.last_user_text().unwrap(), "rewritten");
        assert_eq!(replaced.len(), 3);
    }

    #[test]
    fn test_char_count() {
        let transcript = Transcript::from_prompt("abc").with_assistant("de");
        assert_eq!(transcript.char_count(), 5);
    }
}
