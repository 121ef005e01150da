//! Staged file selection
//!
//! A model picks the files of a project needed for a task by inspecting
//! them in batches and resolving each inspected file before moving on.

pub mod action;
pub mod entities;
pub mod protocol;

pub use action::{ActionShapeError, AssistantAction, Resolution, WireAction};
pub use entities::{FileExtract, FileSelection, IgnoredFile, InspectedFile, SelectedFile};
pub use protocol::{
    DEFAULT_MAX_ITERATIONS, ProtocolError, ProtocolStep, SelectionProtocol, SelectionStage,
    StagedSet, Transition,
};
