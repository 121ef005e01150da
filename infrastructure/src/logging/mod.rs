//! Logging infrastructure: structured conversation logging.
//!
//! Provides [`JsonlConversationLogger`], a JSONL file writer that implements
//! the [`ConversationLogger`](ensemble_application::ConversationLogger) port,
//! and [`new_run_id`] for naming a run's log.

mod jsonl_logger;

pub use jsonl_logger::{JsonlConversationLogger, new_run_id};
