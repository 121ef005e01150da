//! Infrastructure layer for ensemble
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, model providers,
//! the local file system and the JSONL conversation log.

pub mod config;
pub mod fs;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use fs::LocalFileSystem;
pub use logging::{JsonlConversationLogger, new_run_id};
pub use providers::{EchoModel, FallbackModel, ModelRegistry, OpenAiCompatibleModel, RegistryError};
