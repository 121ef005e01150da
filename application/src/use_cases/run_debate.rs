//! Run Debate use case
//!
//! Orchestrates the multi-agent debate: independent initial answers,
//! ring-neighbour refinement rounds, then a mediator merge.

use crate::ports::llm_gateway::{GatewayError, LanguageModel};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use async_trait::async_trait;
use ensemble_domain::{
    Candidate, DebateOutcome, DebateRound, DebateSettings, DomainError, GenerationOptions, Message,
    Phase, PromptTemplate, RingTopology, Transcript,
};
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during a debate
#[derive(Error, Debug)]
pub enum DebateError {
    #[error("Ensemble has no members")]
    NoMembers,

    #[error("Invalid debate input: {0}")]
    Domain(#[from] DomainError),

    #[error("Member {member} ({model}) failed in round {round}: {source}")]
    Member {
        member: usize,
        model: String,
        round: usize,
        source: GatewayError,
    },

    #[error("Mediator {model} failed: {source}")]
    Mediation { model: String, source: GatewayError },
}

impl From<DebateError> for GatewayError {
    fn from(e: DebateError) -> Self {
        match e {
            DebateError::Member { source, .. } | DebateError::Mediation { source, .. } => source,
            other => GatewayError::InvalidRequest(other.to_string()),
        }
    }
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    /// Conversation to answer; must end with a user message
    pub transcript: Transcript,
    pub settings: DebateSettings,
    /// Caller options, passed through to every call
    pub options: GenerationOptions,
}

impl RunDebateInput {
    pub fn new(transcript: impl Into<Transcript>, settings: DebateSettings) -> Self {
        Self {
            transcript: transcript.into(),
            settings,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for running a debate over a fixed ensemble
pub struct RunDebateUseCase {
    mediator: Arc<dyn LanguageModel>,
    members: Vec<Arc<dyn LanguageModel>>,
}

impl RunDebateUseCase {
    pub fn new(
        mediator: Arc<dyn LanguageModel>,
        members: Vec<Arc<dyn LanguageModel>>,
    ) -> Result<Self, DebateError> {
        if members.is_empty() {
            return Err(DebateError::NoMembers);
        }
        Ok(Self { mediator, members })
    }

    /// `mediator|member1|member2...` form of the ensemble.
    pub fn ensemble_id(&self) -> String {
        std::iter::once(self.mediator.id())
            .chain(self.members.iter().map(|m| m.id()))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateOutcome, DebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateOutcome, DebateError> {
        input.settings.validate()?;
        let user_message = input.transcript.last_user_text()?;
        let ring = RingTopology::new(self.members.len()).ok_or(DebateError::NoMembers)?;

        info!(
            "Starting debate with {} members over {} rounds",
            self.members.len(),
            input.settings.rounds
        );

        let mut rounds = Vec::with_capacity(input.settings.rounds.max(1));
        let mut latest = self.initial_round(&input, progress).await?;

        // Round 0 was the initial generation.
        for round in 1..=input.settings.refinement_rounds() {
            let next = self
                .debate_round(round, &input, &user_message, &ring, &latest, progress)
                .await?;
            rounds.push(std::mem::replace(&mut latest, next));
        }

        let answer = self
            .mediate(&input, &user_message, &latest, progress)
            .await?;
        rounds.push(latest);

        Ok(DebateOutcome {
            mediator: self.mediator.id().to_string(),
            rounds,
            answer,
        })
    }

    /// Round 0: every member answers the untouched transcript
    async fn initial_round(
        &self,
        input: &RunDebateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateRound, DebateError> {
        info!("Round 0: initial responses");
        let phase = Phase::Initial;
        progress.on_phase_start(&phase, self.members.len());

        let options = input
            .options
            .clone()
            .with_temperature(input.settings.initial_temperature);
        let calls = (0..self.members.len())
            .map(|i| self.call_member(i, 0, input.transcript.messages(), &options, &phase, progress));
        let candidates = try_join_all(calls).await?;

        progress.on_phase_complete(&phase);
        Ok(DebateRound::new(0, candidates))
    }

    /// Refinement round: each member sees its own latest answer and the
    /// latest answers of its two ring neighbours
    async fn debate_round(
        &self,
        round: usize,
        input: &RunDebateInput,
        user_message: &str,
        ring: &RingTopology,
        previous: &DebateRound,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateRound, DebateError> {
        info!("Round {}: debate", round);
        let phase = Phase::Debate { round };
        progress.on_phase_start(&phase, self.members.len());

        let latest = previous.contents();
        let transcripts = (0..self.members.len())
            .map(|i| {
                let (left, right) = ring.neighbors(i);
                input.transcript.with_last_user_replaced(PromptTemplate::debate_refinement(
                    user_message,
                    latest[i],
                    latest[left],
                    latest[right],
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let calls = transcripts.iter().enumerate().map(|(i, transcript)| {
            self.call_member(i, round, transcript.messages(), &input.options, &phase, progress)
        });
        let candidates = try_join_all(calls).await?;

        progress.on_phase_complete(&phase);
        Ok(DebateRound::new(round, candidates))
    }

    async fn mediate(
        &self,
        input: &RunDebateInput,
        user_message: &str,
        last: &DebateRound,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, DebateError> {
        info!("Mediating {} responses", last.candidates.len());
        let phase = Phase::Mediation;
        progress.on_phase_start(&phase, 1);

        let responses: Vec<String> = last.candidates.iter().map(|c| c.content.clone()).collect();
        let transcript = input
            .transcript
            .with_last_user_replaced(PromptTemplate::mediation(user_message, &responses))?;
        let options = input
            .options
            .clone()
            .with_temperature(input.settings.mediator_temperature)
            .with_id("debate mediation");

        let result = self
            .mediator
            .generate_text(transcript.messages(), &options)
            .await;
        progress.on_task_complete(&phase, self.mediator.id(), result.is_ok());
        let answer = result.map_err(|source| DebateError::Mediation {
            model: self.mediator.id().to_string(),
            source,
        })?;

        progress.on_phase_complete(&phase);
        Ok(answer)
    }

    async fn call_member(
        &self,
        member: usize,
        round: usize,
        messages: &[Message],
        options: &GenerationOptions,
        phase: &Phase,
        progress: &dyn ProgressNotifier,
    ) -> Result<Candidate, DebateError> {
        let model = &self.members[member];
        let options = options
            .clone()
            .with_id(format!("debate round {} member {}", round, member));

        let result = model.generate_text(messages, &options).await;
        progress.on_task_complete(phase, model.id(), result.is_ok());

        match result {
            Ok(content) => {
                debug!("Member {} ({}) answered round {}", member, model.id(), round);
                Ok(Candidate::new(member, model.id(), round, content))
            }
            Err(source) => Err(DebateError::Member {
                member,
                model: model.id().to_string(),
                round,
                source,
            }),
        }
    }
}

/// A debate ensemble exposed as a single [`LanguageModel`]
pub struct DebateModel {
    id: String,
    engine: RunDebateUseCase,
    settings: DebateSettings,
}

impl DebateModel {
    pub fn new(engine: RunDebateUseCase, settings: DebateSettings) -> Self {
        Self {
            id: format!("moa:{}", engine.ensemble_id()),
            engine,
            settings,
        }
    }
}

#[async_trait]
impl LanguageModel for DebateModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_configured(&self) -> bool {
        self.engine.mediator.is_configured() && self.engine.members.iter().all(|m| m.is_configured())
    }

    async fn generate_text(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let input = RunDebateInput::new(Transcript::from_messages(messages.to_vec()), self.settings)
            .with_options(options.clone());
        let outcome = self.engine.execute(input).await?;
        Ok(outcome.answer)
    }
}
