//! Select Files use case
//!
//! Drives the staged file-selection protocol over one growing transcript:
//! the model inspects files, resolves each inspected file, and eventually
//! completes with a non-empty selection. An optional query step answers a
//! question from the same transcript.

use crate::ports::file_system::{FileSystemError, FileSystemPort};
use crate::ports::llm_gateway::{GatewayError, LanguageModel, parse_json};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use ensemble_domain::selection::{
    DEFAULT_MAX_ITERATIONS, ProtocolError, ProtocolStep, SelectionStage, WireAction,
};
use ensemble_domain::{
    AssistantAction, FileSelection, GenerationOptions, IgnoredFile, InspectedFile, Phase,
    PromptTemplate, SelectionProtocol, Transcript, extract_result_tag,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum FileSelectionError {
    #[error("Maximum interaction iterations reached ({max})")]
    MaxIterations { max: usize },

    #[error("Protocol violation in stage {stage}: {message}")]
    ProtocolViolation {
        stage: SelectionStage,
        message: String,
    },

    #[error("No files were selected to fulfill the requirements")]
    NoFilesSelected,

    #[error("Could not list project files: {0}")]
    FileSystem(#[from] FileSystemError),

    #[error("Model call failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Query answer did not contain a <result> block")]
    MissingResult,
}

impl From<ProtocolError> for FileSelectionError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::MaxIterations { max } => FileSelectionError::MaxIterations { max },
            ProtocolError::NoFilesSelected => FileSelectionError::NoFilesSelected,
            violation @ ProtocolError::Violation { stage, .. } => {
                FileSelectionError::ProtocolViolation {
                    stage,
                    message: violation.to_string(),
                }
            }
        }
    }
}

/// Input for the SelectFiles use case
#[derive(Debug, Clone)]
pub struct SelectFilesInput {
    /// Task or query the files are selected for
    pub requirements: String,
    /// Cap on model turns, the initial turn included
    pub max_iterations: usize,
}

impl SelectFilesInput {
    pub fn new(requirements: impl Into<String>) -> Self {
        Self {
            requirements: requirements.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }
}

/// Output of a file selection
#[derive(Debug, Clone, Serialize)]
pub struct SelectFilesOutput {
    pub selection: FileSelection,
    /// Model turns used
    pub iterations: usize,
    #[serde(skip)]
    pub transcript: Transcript,
}

/// Output of the query workflow
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutput {
    pub answer: String,
    pub selection: FileSelection,
}

/// Use case for selecting the files of a project needed for a task
pub struct SelectFilesUseCase {
    model: Arc<dyn LanguageModel>,
    fs: Arc<dyn FileSystemPort>,
}

impl SelectFilesUseCase {
    pub fn new(model: Arc<dyn LanguageModel>, fs: Arc<dyn FileSystemPort>) -> Self {
        Self { model, fs }
    }

    pub async fn execute(
        &self,
        input: SelectFilesInput,
    ) -> Result<SelectFilesOutput, FileSelectionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: SelectFilesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SelectFilesOutput, FileSelectionError> {
        info!(
            "Selecting files with {} (max {} turns)",
            self.model.id(),
            input.max_iterations
        );

        let tree = self.fs.file_tree().await?;
        let mut transcript = Transcript::new()
            .with_system(PromptTemplate::selection_system(&tree))
            .with_user(PromptTemplate::selection_initial(&input.requirements));
        let mut protocol = SelectionProtocol::new(input.max_iterations);

        loop {
            let iteration = protocol.begin_turn()?;
            let phase = Phase::FileSelection { iteration };
            progress.on_phase_start(&phase, 1);

            let options = GenerationOptions::new().with_id(format!("select files {}", iteration));
            let result = self.model.generate_text(transcript.messages(), &options).await;
            progress.on_task_complete(&phase, self.model.id(), result.is_ok());
            let text = result?;

            let action = parse_action(&text, protocol.stage())?;
            debug!("Turn {}: {} in stage {}", iteration, action.kind(), protocol.stage());
            let ignored: Vec<IgnoredFile> = match &action {
                AssistantAction::Resolve(resolution) => resolution.ignore.clone(),
                _ => Vec::new(),
            };

            transcript.push_assistant(text);
            let transition = protocol.apply(action)?;
            for path in &transition.disregarded {
                warn!("Disregarding {} which was not among the inspected files", path);
            }
            progress.on_phase_complete(&phase);

            match transition.step {
                ProtocolStep::Inspect(paths) => {
                    info!("Inspecting {} files", paths.len());
                    let files = self.read_files(&paths).await;
                    transcript.push_user(PromptTemplate::process_files(&files, &paths));
                }
                ProtocolStep::ResolveRemaining(remaining) => {
                    info!("{} inspected files still unresolved", remaining.len());
                    transcript.push_user(PromptTemplate::resolve_remaining(&remaining));
                }
                ProtocolStep::AwaitNext => {
                    transcript.push_user(PromptTemplate::await_next(&ignored));
                }
                ProtocolStep::Complete(selection) => {
                    info!(
                        "Selected {} files in {} turns",
                        selection.files.len(),
                        iteration
                    );
                    return Ok(SelectFilesOutput {
                        selection,
                        iterations: iteration,
                        transcript,
                    });
                }
            }
        }
    }

    /// Select files for `query`, then answer it from the selection transcript.
    pub async fn query(
        &self,
        input: SelectFilesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<QueryOutput, FileSelectionError> {
        let query = input.requirements.clone();
        let SelectFilesOutput {
            selection,
            mut transcript,
            ..
        } = self.execute_with_progress(input, progress).await?;

        transcript.push_user(PromptTemplate::query_answer(&query));
        let options = GenerationOptions::new().with_id("select files query");
        let text = self
            .model
            .generate_text(transcript.messages(), &options)
            .await?;

        let answer = extract_result_tag(&text)
            .ok_or(FileSelectionError::MissingResult)?
            .to_string();
        Ok(QueryOutput { answer, selection })
    }

    /// Read every requested file; failures are annotated, never fatal
    async fn read_files(&self, paths: &[String]) -> Vec<InspectedFile> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match self.fs.read_file(path).await {
                Ok(contents) => files.push(InspectedFile::readable(path.as_str(), contents)),
                Err(e) => {
                    info!("Couldn't read {}: {}", path, e);
                    files.push(InspectedFile::unreadable(path.as_str(), e.to_string()));
                }
            }
        }
        files
    }
}

fn parse_action(text: &str, stage: SelectionStage) -> Result<AssistantAction, FileSelectionError> {
    let violation = |message: String| FileSelectionError::ProtocolViolation { stage, message };
    let wire: WireAction = parse_json(text).map_err(|e| violation(e.to_string()))?;
    AssistantAction::try_from(wire).map_err(|e| violation(e.to_string()))
}
