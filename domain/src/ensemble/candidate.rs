//! Candidate answers produced during an orchestration call.

use serde::{Deserialize, Serialize};

/// A generated answer tied to the member that produced it and the round it
/// was produced in. Round 0 is the initial generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub member: usize,
    pub model: String,
    pub round: usize,
    pub content: String,
}

impl Candidate {
    pub fn new(
        member: usize,
        model: impl Into<String>,
        round: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            member,
            model: model.into(),
            round,
            content: content.into(),
        }
    }
}

/// Candidates of one debate round, indexed by member position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRound {
    pub round: usize,
    pub candidates: Vec<Candidate>,
}

impl DebateRound {
    pub fn new(round: usize, candidates: Vec<Candidate>) -> Self {
        Self { round, candidates }
    }

    /// Contents in member order.
    pub fn contents(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.content.as_str()).collect()
    }
}

/// Full trace of a debate: every round plus the mediated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateOutcome {
    pub mediator: String,
    pub rounds: Vec<DebateRound>,
    pub answer: String,
}

impl DebateOutcome {
    /// Candidates that were handed to the mediator.
    pub fn final_candidates(&self) -> &[Candidate] {
        self.rounds
            .last()
            .map(|r| r.candidates.as_slice())
            .unwrap_or(&[])
    }
}
