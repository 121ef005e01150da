use serde::{Deserialize, Serialize};

/// Phase of an orchestration run, reported to progress notifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Every ensemble member answers the task independently
    Initial,
    /// Refinement round (1-based, round 0 is [`Phase::Initial`])
    Debate { round: usize },
    /// Mediator merges the final round
    Mediation,
    /// Plan/execute/refine/finalize pipeline for one best-of-N candidate
    Planning { candidate: usize },
    /// Candidates are rated and one is selected
    Rating,
    /// One model turn of the staged file-selection protocol
    FileSelection { iteration: usize },
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Initial => "initial",
            Phase::Debate { .. } => "debate",
            Phase::Mediation => "mediation",
            Phase::Planning { .. } => "planning",
            Phase::Rating => "rating",
            Phase::FileSelection { .. } => "file_selection",
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Phase::Initial => "Initial Responses".to_string(),
            Phase::Debate { round } => format!("Debate Round {}", round),
            Phase::Mediation => "Mediation".to_string(),
            Phase::Planning { candidate } => format!("Planning Candidate {}", candidate + 1),
            Phase::Rating => "Rating".to_string(),
            Phase::FileSelection { iteration } => format!("File Selection Turn {}", iteration),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
