//! Domain layer for ensemble
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate ensemble
//!
//! Several models answer the same task, refine their answers over a few
//! rounds while looking at their ring neighbours, and a mediator merges the
//! final round into one answer.
//!
//! ## Best-of-N planning
//!
//! One model plans, executes and refines a solution several times; the
//! resulting candidates are rated (absolute or pairwise) and the best wins.
//!
//! ## Staged file selection
//!
//! A model explores a project by inspecting files in batches and must
//! resolve every inspected file before inspecting more or completing.

pub mod core;
pub mod ensemble;
pub mod orchestration;
pub mod planning;
pub mod prompt;
pub mod rating;
pub mod selection;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{ModelId, ModelTier},
};
pub use ensemble::{Candidate, DebateOutcome, DebateRound, DebateSettings, EnsembleSpec, RingTopology};
pub use orchestration::Phase;
pub use planning::BestOfNConfig;
pub use prompt::PromptTemplate;
pub use rating::{
    PairwiseTally, PairwiseVerdict, Rating, RatingMode, RatingOutcome, parse_better_response,
    parse_rating,
};
pub use selection::{
    AssistantAction, FileExtract, FileSelection, IgnoredFile, InspectedFile, ProtocolError,
    ProtocolStep, SelectedFile, SelectionProtocol, SelectionStage,
};
pub use session::{
    entities::{Content, ContentPart, Message, Role},
    options::GenerationOptions,
    transcript::Transcript,
};
pub use util::{extract_json, extract_result_tag};
