//! Conversation building blocks: messages, transcripts and generation options.

pub mod entities;
pub mod options;
pub mod transcript;
