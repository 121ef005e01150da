//! Application layer for ensemble
//!
//! This crate contains use cases, port definitions, and the per-run context.
//! It depends only on the domain layer.

pub mod config;
pub mod context;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ModelPricing, PricingTable};
pub use context::{MeteredModel, ModelTiers, RunContext, UsageTotals};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    file_system::{FileSystemError, FileSystemPort},
    llm_gateway::{GatewayError, LanguageModel, LanguageModelExt},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::rate_candidates::{RateCandidatesUseCase, RatingError};
pub use use_cases::run_best_of_n::{BestOfNError, BestOfNModel, BestOfNOutput, RunBestOfNUseCase};
pub use use_cases::run_debate::{DebateError, DebateModel, RunDebateInput, RunDebateUseCase};
pub use use_cases::select_files::{
    FileSelectionError, QueryOutput, SelectFilesInput, SelectFilesOutput, SelectFilesUseCase,
};
