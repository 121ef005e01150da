//! Prompt domain
//!
//! Templates for the user/assistant turns each engine appends to a transcript.

mod template;

pub use template::PromptTemplate;
