//! Run Best-of-N use case
//!
//! Produces `bestofn_n` independent candidates with a plan, execute,
//! refine, finalize pipeline and returns the one the judge rates best.

use crate::ports::llm_gateway::{GatewayError, LanguageModel};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::rate_candidates::{RateCandidatesUseCase, RatingError};
use async_trait::async_trait;
use ensemble_domain::{
    BestOfNConfig, DomainError, GenerationOptions, Message, Phase, PromptTemplate, RatingOutcome,
    Transcript,
};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BestOfNError {
    #[error("Invalid best-of-N input: {0}")]
    Domain(#[from] DomainError),

    #[error("Candidate {candidate}: no valid plan after {attempts} attempts: {source}")]
    NoValidPlans {
        candidate: usize,
        attempts: usize,
        source: GatewayError,
    },

    #[error("Candidate {candidate}: plan refinement failed: {source}")]
    Refine {
        candidate: usize,
        source: GatewayError,
    },

    #[error("Candidate {candidate}: final answer failed: {source}")]
    Finalize {
        candidate: usize,
        source: GatewayError,
    },

    #[error("Rating failed: {0}")]
    Rating(#[from] RatingError),
}

impl From<BestOfNError> for GatewayError {
    fn from(e: BestOfNError) -> Self {
        match e {
            BestOfNError::NoValidPlans { source, .. }
            | BestOfNError::Refine { source, .. }
            | BestOfNError::Finalize { source, .. }
            | BestOfNError::Rating(RatingError::Judge { source, .. }) => source,
            other => GatewayError::InvalidRequest(other.to_string()),
        }
    }
}

/// Output of a best-of-N run
#[derive(Debug, Clone, Serialize)]
pub struct BestOfNOutput {
    pub candidates: Vec<String>,
    pub rating: RatingOutcome,
    pub answer: String,
}

/// Use case for best-of-N planning with a single underlying model
#[derive(Clone)]
pub struct RunBestOfNUseCase {
    model: Arc<dyn LanguageModel>,
    config: BestOfNConfig,
    label: Option<String>,
}

impl RunBestOfNUseCase {
    pub fn new(model: Arc<dyn LanguageModel>, config: BestOfNConfig) -> Self {
        Self {
            model,
            config,
            label: None,
        }
    }

    /// Prefix every call id with `label`, so nested runs stay traceable.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn config(&self) -> &BestOfNConfig {
        &self.config
    }

    pub async fn execute(&self, task: &Transcript) -> Result<BestOfNOutput, BestOfNError> {
        self.execute_with_progress(task, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        task: &Transcript,
        progress: &dyn ProgressNotifier,
    ) -> Result<BestOfNOutput, BestOfNError> {
        self.config.validate()?;
        let question = task.last_user_text()?;

        info!(
            "Starting best-of-{} with {} ({} rating)",
            self.config.bestofn_n,
            self.model.id(),
            self.config.bestofn_rating_type
        );

        let candidates = if self.config.parallel_candidates {
            try_join_all(
                (0..self.config.bestofn_n).map(|i| self.candidate(i, task, &question, progress)),
            )
            .await?
        } else {
            let mut candidates = Vec::with_capacity(self.config.bestofn_n);
            for i in 0..self.config.bestofn_n {
                candidates.push(self.candidate(i, task, &question, progress).await?);
            }
            candidates
        };

        let mut rating_options = GenerationOptions::new()
            .with_temperature(self.config.bestofn_temperature)
            .with_max_output_tokens(self.config.bestofn_max_tokens);
        if let Some(label) = &self.label {
            rating_options = rating_options.with_id(label.as_str());
        }
        let rater = RateCandidatesUseCase::new(self.model.clone()).with_options(rating_options);
        let rating = rater
            .execute_with_progress(&candidates, task, self.config.bestofn_rating_type, progress)
            .await?;
        let answer = candidates[rating.selected].clone();

        Ok(BestOfNOutput {
            candidates,
            rating,
            answer,
        })
    }

    /// One full plan → execute → refine → finalize pipeline
    async fn candidate(
        &self,
        index: usize,
        task: &Transcript,
        question: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, BestOfNError> {
        let phase = Phase::Planning { candidate: index };
        progress.on_phase_start(&phase, self.config.planning_n + 2);

        let result = self.run_pipeline(index, task, question, &phase, progress).await;

        progress.on_phase_complete(&phase);
        result
    }

    async fn run_pipeline(
        &self,
        index: usize,
        task: &Transcript,
        question: &str,
        phase: &Phase,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, BestOfNError> {
        let executions = self.collect_executions(index, task, question, phase, progress).await?;

        let refine = task
            .clone()
            .with_assistant(PromptTemplate::combined_plans(&executions))
            .with_user(PromptTemplate::refine_plan(question));
        let refined = self
            .step(refine, 3, format!("candidate {} refine", index), phase, progress)
            .await
            .map_err(|source| BestOfNError::Refine {
                candidate: index,
                source,
            })?;

        let finalize = task
            .clone()
            .with_assistant(refined)
            .with_user(PromptTemplate::final_answer(question));
        let answer = self
            .step(finalize, 4, format!("candidate {} final", index), phase, progress)
            .await
            .map_err(|source| BestOfNError::Finalize {
                candidate: index,
                source,
            })?;

        debug!("Candidate {} finished", index);
        Ok(answer)
    }

    /// Collect up to `planning_n` plan/execute outputs within `planning_m`
    /// attempts. When every attempt failed, one forced attempt is made and
    /// its failure is fatal.
    async fn collect_executions(
        &self,
        index: usize,
        task: &Transcript,
        question: &str,
        phase: &Phase,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<String>, BestOfNError> {
        let mut executions = Vec::with_capacity(self.config.planning_n);
        let mut attempts = 0;

        while executions.len() < self.config.planning_n && attempts < self.config.planning_m {
            attempts += 1;
            match self.plan_and_execute(index, attempts, task, question, phase, progress).await {
                Ok(execution) => executions.push(execution),
                Err(e) => warn!(
                    "Candidate {}: plan attempt {} failed: {}",
                    index, attempts, e
                ),
            }
        }

        if executions.is_empty() {
            warn!(
                "Candidate {}: all {} plan attempts failed, making a final attempt",
                index, attempts
            );
            attempts += 1;
            let execution = self
                .plan_and_execute(index, attempts, task, question, phase, progress)
                .await
                .map_err(|source| BestOfNError::NoValidPlans {
                    candidate: index,
                    attempts,
                    source,
                })?;
            executions.push(execution);
        }

        debug!(
            "Candidate {}: {} executions from {} attempts",
            index,
            executions.len(),
            attempts
        );
        Ok(executions)
    }

    async fn plan_and_execute(
        &self,
        index: usize,
        attempt: usize,
        task: &Transcript,
        question: &str,
        phase: &Phase,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        let plan_request = task.clone().with_user(PromptTemplate::plan(question));
        let plan = self
            .step(
                plan_request,
                1,
                format!("candidate {} plan {}", index, attempt),
                phase,
                progress,
            )
            .await?;

        let execute_request = task
            .clone()
            .with_assistant(plan)
            .with_user(PromptTemplate::execute_plan());
        self.step(
            execute_request,
            2,
            format!("candidate {} execute {}", index, attempt),
            phase,
            progress,
        )
        .await
    }

    /// One model call with the temperature and output budget of `step` (1-4)
    async fn step(
        &self,
        transcript: Transcript,
        step: u8,
        label: String,
        phase: &Phase,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        let (temperature, max_tokens) = match step {
            1 => (
                self.config.planning_temperature_step1,
                self.config.planning_max_tokens_step1,
            ),
            2 => (
                self.config.planning_temperature_step2,
                self.config.planning_max_tokens_step2,
            ),
            3 => (
                self.config.planning_temperature_step3,
                self.config.planning_max_tokens_step3,
            ),
            _ => (
                self.config.planning_temperature_step4,
                self.config.planning_max_tokens_step4,
            ),
        };
        let options = GenerationOptions::new()
            .with_temperature(temperature)
            .with_max_output_tokens(max_tokens)
            .with_id(match &self.label {
                Some(prefix) => format!("{}: {}", prefix, label),
                None => label,
            });

        let result = self.model.generate_text(transcript.messages(), &options).await;
        progress.on_task_complete(phase, self.model.id(), result.is_ok());
        result
    }
}

/// Best-of-N planning exposed as a single [`LanguageModel`]
pub struct BestOfNModel {
    id: String,
    engine: RunBestOfNUseCase,
}

impl BestOfNModel {
    pub fn new(engine: RunBestOfNUseCase) -> Self {
        Self {
            id: format!("cepo:{}", engine.model.id()),
            engine,
        }
    }
}

#[async_trait]
impl LanguageModel for BestOfNModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_configured(&self) -> bool {
        self.engine.model.is_configured()
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let task = Transcript::from_messages(messages.to_vec());
        // Step temperatures and budgets come from the config; only the
        // caller's label carries over.
        let output = match &options.id {
            Some(label) => self.engine.clone().with_label(label.as_str()).execute(&task).await?,
            None => self.engine.execute(&task).await?,
        };
        Ok(output.answer)
    }
}
