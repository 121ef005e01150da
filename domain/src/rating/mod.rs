//! Candidate rating domain
//!
//! Two ways of picking one answer out of several:
//!
//! - **Absolute**: a judge scores each candidate against a fixed rubric and
//!   ends with `Rating: [[n]]`; the first highest score wins.
//! - **Pairwise**: a judge compares every unordered pair and answers
//!   `Better Response: [[0]]` or `[[1]]`; the first candidate with the most
//!   wins is selected.

pub mod parsing;
pub mod tally;

pub use parsing::{PairwiseVerdict, parse_better_response, parse_rating};
pub use tally::{
    MAX_SCORE, PairwiseTally, Rating, RatingMode, RatingOutcome, absolute_outcome,
    first_max_index, unordered_pairs,
};
