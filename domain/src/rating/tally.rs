//! Rating modes, tallies and argmax selection.

use super::parsing::PairwiseVerdict;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Highest score accepted from an absolute judge.
pub const MAX_SCORE: u32 = 10;

/// How candidates are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingMode {
    /// One rubric-based 0-10 score per candidate.
    #[default]
    Absolute,
    /// One comparison per unordered pair, winners tallied.
    Pairwise,
}

impl RatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingMode::Absolute => "absolute",
            RatingMode::Pairwise => "pairwise",
        }
    }
}

impl std::fmt::Display for RatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RatingMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(RatingMode::Absolute),
            "pairwise" => Ok(RatingMode::Pairwise),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown rating type '{}'",
                other
            ))),
        }
    }
}

/// Rating attached to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Absolute score, 0 when the judge's answer could not be parsed.
    Score(u32),
    /// Pairwise win count.
    Wins(u32),
}

impl Rating {
    pub fn value(&self) -> u32 {
        match self {
            Rating::Score(v) | Rating::Wins(v) => *v,
        }
    }
}

/// Result of rating a candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingOutcome {
    pub mode: RatingMode,
    pub ratings: Vec<Rating>,
    pub selected: usize,
}

/// Index of the first maximal value; `None` for an empty slice.
///
/// Ties resolve to the earliest index, e.g. `[7, 9, 9, 3]` selects `1`.
pub fn first_max_index(values: &[u32]) -> Option<usize> {
    let max = values.iter().copied().max()?;
    values.iter().position(|&v| v == max)
}

/// All unordered pairs `(i, j)` with `i < j < n`, in lexicographic order.
pub fn unordered_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Win counter for pairwise comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseTally {
    wins: Vec<u32>,
}

impl PairwiseTally {
    pub fn new(candidates: usize) -> Self {
        Self {
            wins: vec![0; candidates],
        }
    }

    /// Record one comparison. `None` (unparsable verdict) awards nothing.
    pub fn record(&mut self, pair: (usize, usize), verdict: Option<PairwiseVerdict>) {
        let winner = match verdict {
            Some(PairwiseVerdict::First) => pair.0,
            Some(PairwiseVerdict::Second) => pair.1,
            None => return,
        };
        if let Some(count) = self.wins.get_mut(winner) {
            *count += 1;
        }
    }

    pub fn wins(&self) -> &[u32] {
        &self.wins
    }

    pub fn winner(&self) -> Option<usize> {
        first_max_index(&self.wins)
    }

    pub fn into_outcome(self) -> Option<RatingOutcome> {
        let selected = self.winner()?;
        Some(RatingOutcome {
            mode: RatingMode::Pairwise,
            ratings: self.wins.into_iter().map(Rating::Wins).collect(),
            selected,
        })
    }
}

/// Build an absolute-mode outcome from per-candidate scores.
pub fn absolute_outcome(scores: Vec<u32>) -> Option<RatingOutcome> {
    let selected = first_max_index(&scores)?;
    Some(RatingOutcome {
        mode: RatingMode::Absolute,
        ratings: scores.into_iter().map(Rating::Score).collect(),
        selected,
    })
}
