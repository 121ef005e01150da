//! Staged file-selection state machine.
//!
//! The model first asks to inspect files. Inspected files become *staged*
//! and must each be resolved (selected, extracted or ignored) before the
//! model may inspect more or declare the selection complete.
//!
//! ```text
//! Initial ──inspect──▶ PostInspect ──resolve (staged empty)──▶ AllInspected
//!                        ▲    │                                   │    │
//!                        │    └─resolve (staged left)─┐           │  complete
//!                        │                            ▼           │    ▼
//!                        └────────── inspect ─────────────────────┘  Done
//! ```
//!
//! The machine is pure: it never reads files or talks to a model. The
//! caller feeds it one [`AssistantAction`] per model turn and acts on the
//! returned [`ProtocolStep`].

use super::action::{AssistantAction, Resolution};
use super::entities::FileSelection;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Default cap on model turns, the initial turn included.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStage {
    /// Nothing inspected yet.
    Initial,
    /// Files were shown to the model and some are still unresolved.
    PostInspect,
    /// Every staged file has been resolved.
    AllInspected,
    /// Selection was completed.
    Done,
}

impl SelectionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStage::Initial => "initial",
            SelectionStage::PostInspect => "post-inspect",
            SelectionStage::AllInspected => "all-inspected",
            SelectionStage::Done => "done",
        }
    }

    /// Actions accepted in this stage, for error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            SelectionStage::Initial => "inspectFiles",
            SelectionStage::PostInspect => "selectFiles/ignoreFiles",
            SelectionStage::AllInspected => "inspectFiles or complete",
            SelectionStage::Done => "nothing",
        }
    }
}

impl fmt::Display for SelectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("maximum interaction iterations reached ({max})")]
    MaxIterations { max: usize },

    #[error("protocol violation in stage {stage}: expected {expected}, got {found}")]
    Violation {
        stage: SelectionStage,
        expected: &'static str,
        found: String,
    },

    #[error("no files were selected to fulfill the requirements")]
    NoFilesSelected,
}

impl ProtocolError {
    pub fn violation(stage: SelectionStage, found: impl Into<String>) -> Self {
        ProtocolError::Violation {
            stage,
            expected: stage.expected(),
            found: found.into(),
        }
    }
}

/// Paths shown to the model and not yet resolved.
///
/// Never mutated in place: resolving returns a new set without the
/// resolved paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedSet(BTreeSet<String>);

impl StagedSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// The set minus `resolved`.
    pub fn difference<'a, I>(&self, resolved: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let resolved: BTreeSet<&str> = resolved.into_iter().collect();
        Self(
            self.0
                .iter()
                .filter(|path| !resolved.contains(path.as_str()))
                .cloned()
                .collect(),
        )
    }
}

/// What the caller has to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolStep {
    /// Read these files and send their contents back.
    Inspect(Vec<String>),
    /// Ask the model to resolve the remaining staged paths.
    ResolveRemaining(Vec<String>),
    /// All staged files resolved; the model may inspect more or complete.
    AwaitNext,
    /// Selection is final.
    Complete(FileSelection),
}

/// Result of applying one model turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub step: ProtocolStep,
    /// Paths the model resolved that were not staged. They are dropped.
    pub disregarded: Vec<String>,
}

impl Transition {
    fn clean(step: ProtocolStep) -> Self {
        Self {
            step,
            disregarded: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionProtocol {
    stage: SelectionStage,
    staged: StagedSet,
    selection: FileSelection,
    iteration: usize,
    max_iterations: usize,
}

impl SelectionProtocol {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            stage: SelectionStage::Initial,
            staged: StagedSet::default(),
            selection: FileSelection::default(),
            iteration: 0,
            max_iterations,
        }
    }

    pub fn stage(&self) -> SelectionStage {
        self.stage
    }

    pub fn staged(&self) -> &StagedSet {
        &self.staged
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Account for one model turn. Fails once the cap would be exceeded.
    pub fn begin_turn(&mut self) -> Result<usize, ProtocolError> {
        if self.iteration >= self.max_iterations {
            return Err(ProtocolError::MaxIterations {
                max: self.max_iterations,
            });
        }
        self.iteration += 1;
        Ok(self.iteration)
    }

    pub fn apply(&mut self, action: AssistantAction) -> Result<Transition, ProtocolError> {
        match (self.stage, action) {
            (SelectionStage::Initial | SelectionStage::AllInspected, AssistantAction::Inspect(paths)) => {
                self.staged = StagedSet::new(paths);
                self.stage = SelectionStage::PostInspect;
                Ok(Transition::clean(ProtocolStep::Inspect(self.staged.paths())))
            }
            (SelectionStage::PostInspect, AssistantAction::Resolve(resolution)) => {
                let disregarded: Vec<String> = resolution
                    .paths()
                    .into_iter()
                    .filter(|path| !self.staged.contains(path))
                    .map(str::to_string)
                    .collect();
                let Resolution {
                    select,
                    ignore,
                    extract,
                } = resolution;

                for file in select {
                    if self.staged.contains(&file.path) && !self.selection.contains(&file.path) {
                        self.selection.files.push(file);
                    }
                }
                for extract in extract {
                    if self.staged.contains(&extract.path) {
                        self.selection.extracts.push(extract);
                    }
                }

                let resolved: Vec<&str> = self
                    .selection
                    .files
                    .iter()
                    .map(|f| f.path.as_str())
                    .chain(self.selection.extracts.iter().map(|e| e.path.as_str()))
                    .chain(ignore.iter().map(|i| i.path.as_str()))
                    .collect();
                self.staged = self.staged.difference(resolved);

                let step = if self.staged.is_empty() {
                    self.stage = SelectionStage::AllInspected;
                    ProtocolStep::AwaitNext
                } else {
                    ProtocolStep::ResolveRemaining(self.staged.paths())
                };
                Ok(Transition { step, disregarded })
            }
            (SelectionStage::AllInspected, AssistantAction::Complete) => {
                if self.selection.is_empty() {
                    return Err(ProtocolError::NoFilesSelected);
                }
                self.stage = SelectionStage::Done;
                Ok(Transition::clean(ProtocolStep::Complete(
                    self.selection.clone(),
                )))
            }
            (stage, action) => Err(ProtocolError::violation(stage, action.kind())),
        }
    }
}

impl Default for SelectionProtocol {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}
