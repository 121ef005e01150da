//! Decision parsing for candidate rating.
//!
//! These functions extract structured decisions from free-form judge
//! responses. They are pure domain logic: no I/O, just pattern matching.
//! A response that does not follow the requested format yields `None`;
//! what `None` means (score 0, no vote) is decided by the caller.
//!
//! | Function | Rating mode | Pattern |
//! |----------|-------------|---------|
//! | [`parse_rating`] | Absolute | `Rating: [[n]]` |
//! | [`parse_better_response`] | Pairwise | `Better Response: [[0]]` / `[[1]]` |

use super::tally::MAX_SCORE;
use regex::Regex;
use std::sync::LazyLock;

static RATING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rating: \[\[(\d+)\]\]").expect("static regex"));

static BETTER_RESPONSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Better Response: \[\[(\d+)\]\]").expect("static regex"));

/// Which side of a pairwise comparison won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairwiseVerdict {
    /// The first-listed response (`[[0]]`).
    First,
    /// The second-listed response (`[[1]]`).
    Second,
}

/// Parse the first `Rating: [[n]]` occurrence.
///
/// Scores above [`MAX_SCORE`] are out of the rubric's range and yield `None`.
///
/// # Examples
///
/// ```
/// use ensemble_domain::rating::parse_rating;
///
/// assert_eq!(parse_rating("Solid answer.\nRating: [[8]]"), Some(8));
/// assert_eq!(parse_rating("I would give it an 8"), None);
/// assert_eq!(parse_rating("Rating: [[85]]"), None);
/// ```
pub fn parse_rating(response: &str) -> Option<u32> {
    RATING_PATTERN
        .captures(response)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|score| *score <= MAX_SCORE)
}

/// Parse the first `Better Response: [[n]]` occurrence.
///
/// Only `0` and `1` are meaningful; any other index is treated as no
/// decision.
pub fn parse_better_response(response: &str) -> Option<PairwiseVerdict> {
    let caps = BETTER_RESPONSE_PATTERN.captures(response)?;
    match caps.get(1)?.as_str() {
        "0" => Some(PairwiseVerdict::First),
        "1" => Some(PairwiseVerdict::Second),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse_rating Tests ====================

    #[test]
    fn test_parse_rating_basic() {
        assert_eq!(parse_rating("Rating: [[7]]"), Some(7));
        assert_eq!(parse_rating("Rating: [[10]]"), Some(10));
    }

    #[test]
    fn test_parse_rating_with_explanation() {
        let response = "The answer is correct but terse.\n\nRating: [[6]]\n";
        assert_eq!(parse_rating(response), Some(6));
    }

    #[test]
    fn test_parse_rating_first_match_wins() {
        assert_eq!(parse_rating("Rating: [[3]] ... Rating: [[9]]"), Some(3));
    }

    #[test]
    fn test_parse_rating_no_match() {
        assert_eq!(parse_rating("Rating: 7/10"), None);
        assert_eq!(parse_rating("rating: [[7]]"), None);
        assert_eq!(parse_rating("Rating: [[seven]]"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn test_parse_rating_above_max_is_none() {
        assert_eq!(parse_rating("Rating: [[0]]"), Some(0));
        assert_eq!(parse_rating("Rating: [[11]]"), None);
        assert_eq!(parse_rating("Rating: [[85]]"), None);
    }

    #[test]
    fn test_parse_rating_overflow_is_none() {
        assert_eq!(parse_rating("Rating: [[99999999999999999999]]"), None);
    }

    // ==================== parse_better_response Tests ====================

    #[test]
    fn test_better_response_first() {
        assert_eq!(
            parse_better_response("Both are fine.\nBetter Response: [[0]]"),
            Some(PairwiseVerdict::First)
        );
    }

    #[test]
    fn test_better_response_second() {
        assert_eq!(
            parse_better_response("Better Response: [[1]]"),
            Some(PairwiseVerdict::Second)
        );
    }

    #[test]
    fn test_better_response_out_of_range() {
        assert_eq!(parse_better_response("Better Response: [[2]]"), None);
    }

    #[test]
    fn test_better_response_missing() {
        assert_eq!(parse_better_response("The second one is better."), None);
    }
}
