//! Rate Candidates use case
//!
//! Picks one answer out of several with a judge model, either by scoring
//! each candidate against a rubric or by comparing every pair.

use crate::ports::llm_gateway::{GatewayError, LanguageModel};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use ensemble_domain::rating::{absolute_outcome, unordered_pairs};
use ensemble_domain::{
    GenerationOptions, PairwiseTally, Phase, PromptTemplate, RatingMode, RatingOutcome, Rating,
    Transcript, parse_better_response, parse_rating,
};
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("No candidates to rate")]
    NoCandidates,

    #[error("Judge call for {what} failed: {source}")]
    Judge { what: String, source: GatewayError },
}

/// Use case for selecting the best of several candidate answers
pub struct RateCandidatesUseCase {
    judge: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl RateCandidatesUseCase {
    pub fn new(judge: Arc<dyn LanguageModel>) -> Self {
        Self {
            judge,
            options: GenerationOptions::default(),
        }
    }

    /// Options for every judge call (temperature, output budget)
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Options for one judge call; an `id` already set on the base options
    /// becomes a prefix.
    fn call_options(&self, what: String) -> GenerationOptions {
        let id = match &self.options.id {
            Some(prefix) => format!("{}: {}", prefix, what),
            None => what,
        };
        self.options.clone().with_id(id)
    }

    pub async fn execute(
        &self,
        candidates: &[String],
        task: &Transcript,
        mode: RatingMode,
    ) -> Result<RatingOutcome, RatingError> {
        self.execute_with_progress(candidates, task, mode, &NoProgress)
            .await
    }

    /// Rate `candidates` as answers to `task`.
    ///
    /// A judge answer without the expected pattern counts as a score of 0
    /// (absolute) or no vote (pairwise). Ties go to the earliest candidate.
    pub async fn execute_with_progress(
        &self,
        candidates: &[String],
        task: &Transcript,
        mode: RatingMode,
        progress: &dyn ProgressNotifier,
    ) -> Result<RatingOutcome, RatingError> {
        match candidates.len() {
            0 => return Err(RatingError::NoCandidates),
            1 => {
                debug!("Single candidate, skipping rating");
                let rating = match mode {
                    RatingMode::Absolute => Rating::Score(0),
                    RatingMode::Pairwise => Rating::Wins(0),
                };
                return Ok(RatingOutcome {
                    mode,
                    ratings: vec![rating],
                    selected: 0,
                });
            }
            _ => {}
        }

        info!("Rating {} candidates ({})", candidates.len(), mode);
        let outcome = match mode {
            RatingMode::Absolute => self.rate_absolute(candidates, task, progress).await?,
            RatingMode::Pairwise => self.rate_pairwise(candidates, task, progress).await?,
        };
        info!(
            "Selected candidate {} ({:?})",
            outcome.selected,
            outcome.ratings.iter().map(Rating::value).collect::<Vec<_>>()
        );
        Ok(outcome)
    }

    async fn rate_absolute(
        &self,
        candidates: &[String],
        task: &Transcript,
        progress: &dyn ProgressNotifier,
    ) -> Result<RatingOutcome, RatingError> {
        let phase = Phase::Rating;
        progress.on_phase_start(&phase, candidates.len());

        let calls = candidates.iter().enumerate().map(|(i, candidate)| {
            let transcript = task
                .clone()
                .with_assistant(candidate.as_str())
                .with_user(PromptTemplate::absolute_rating());
            let options = self.call_options(format!("rate candidate {}", i));
            let phase = &phase;
            async move {
                let result = self.judge.generate_text(transcript.messages(), &options).await;
                progress.on_task_complete(phase, self.judge.id(), result.is_ok());
                let text = result.map_err(|source| RatingError::Judge {
                    what: format!("candidate {}", i),
                    source,
                })?;
                Ok::<u32, RatingError>(parse_rating(&text).unwrap_or_else(|| {
                    warn!("No valid rating for candidate {}, scoring 0", i);
                    0
                }))
            }
        });
        let scores = try_join_all(calls).await?;

        progress.on_phase_complete(&phase);
        absolute_outcome(scores).ok_or(RatingError::NoCandidates)
    }

    async fn rate_pairwise(
        &self,
        candidates: &[String],
        task: &Transcript,
        progress: &dyn ProgressNotifier,
    ) -> Result<RatingOutcome, RatingError> {
        let phase = Phase::Rating;
        let pairs = unordered_pairs(candidates.len());
        progress.on_phase_start(&phase, pairs.len());

        let calls = pairs.iter().map(|&(i, j)| {
            let transcript = task
                .clone()
                .with_assistant(PromptTemplate::response_pair(&candidates[i], &candidates[j]))
                .with_user(PromptTemplate::pairwise_rating());
            let options = self.call_options(format!("compare {} vs {}", i, j));
            let phase = &phase;
            async move {
                let result = self.judge.generate_text(transcript.messages(), &options).await;
                progress.on_task_complete(phase, self.judge.id(), result.is_ok());
                let text = result.map_err(|source| RatingError::Judge {
                    what: format!("pair ({}, {})", i, j),
                    source,
                })?;
                let verdict = parse_better_response(&text);
                if verdict.is_none() {
                    warn!("No verdict for pair ({}, {}), no point awarded", i, j);
                }
                Ok::<_, RatingError>(((i, j), verdict))
            }
        });
        let verdicts = try_join_all(calls).await?;

        let mut tally = PairwiseTally::new(candidates.len());
        for (pair, verdict) in verdicts {
            tally.record(pair, verdict);
        }

        progress.on_phase_complete(&phase);
        tally.into_outcome().ok_or(RatingError::NoCandidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedModel;

    fn candidates(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    /// Judge scoring the candidate in the assistant turn by a lookup table
    fn scoring_judge(table: &'static [(&'static str, &'static str)]) -> Arc<ScriptedModel> {
        Arc::new(ScriptedModel::new("judge", move |messages, _| {
            let candidate = messages[messages.len() - 2].text();
            let reply = table
                .iter()
                .find(|(c, _)| *c == candidate)
                .map(|(_, r)| r.to_string())
                .unwrap_or_default();
            Ok(reply)
        }))
    }

    // ==================== Absolute ====================

    #[tokio::test]
    async fn test_absolute_first_max_wins() {
        let judge = scoring_judge(&[
            ("a", "ok. Rating: [[7]]"),
            ("b", "great. Rating: [[9]]"),
            ("c", "also great. Rating: [[9]]"),
            ("d", "weak. Rating: [[3]]"),
        ]);
        let rater = RateCandidatesUseCase::new(judge.clone());

        let outcome = rater
            .execute(&candidates(&["a", "b", "c", "d"]), &"Q?".into(), RatingMode::Absolute)
            .await
            .unwrap();

        assert_eq!(outcome.selected, 1);
        assert_eq!(
            outcome.ratings,
            vec![Rating::Score(7), Rating::Score(9), Rating::Score(9), Rating::Score(3)]
        );
        assert_eq!(judge.call_count(), 4);
    }

    #[tokio::test]
    async fn test_absolute_unparsable_scores_zero() {
        let judge = scoring_judge(&[("a", "no idea"), ("b", "Rating: [[2]]")]);
        let rater = RateCandidatesUseCase::new(judge);

        let outcome = rater
            .execute(&candidates(&["a", "b"]), &"Q?".into(), RatingMode::Absolute)
            .await
            .unwrap();

        assert_eq!(outcome.ratings[0], Rating::Score(0));
        assert_eq!(outcome.selected, 1);
    }

    #[tokio::test]
    async fn test_absolute_out_of_range_score_is_zero() {
        let judge = scoring_judge(&[("good", "Rating: [[10]]"), ("weird", "Rating: [[85]]")]);
        let rater = RateCandidatesUseCase::new(judge);

        let outcome = rater
            .execute(&candidates(&["good", "weird"]), &"Q?".into(), RatingMode::Absolute)
            .await
            .unwrap();

        assert_eq!(outcome.ratings, vec![Rating::Score(10), Rating::Score(0)]);
        assert_eq!(outcome.selected, 0);
    }

    #[tokio::test]
    async fn test_absolute_prompt_layout() {
        let judge = scoring_judge(&[("a", "Rating: [[1]]"), ("b", "Rating: [[1]]")]);
        let rater = RateCandidatesUseCase::new(judge.clone())
            .with_options(GenerationOptions::new().with_temperature(0.1));

        rater
            .execute(&candidates(&["a", "b"]), &"Q?".into(), RatingMode::Absolute)
            .await
            .unwrap();

        let request = &judge.requests()[0];
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].text(), "Q?");
        assert!(request.last_text().contains("Rating: [[rating]]"));
        assert_eq!(request.options.temperature, Some(0.1));
    }

    // ==================== Pairwise ====================

    #[tokio::test]
    async fn test_pairwise_tally() {
        // 0 beats 1, 0 beats 2, 1 beats 2 -> wins [2, 1, 0]
        let judge = Arc::new(ScriptedModel::new("judge", |messages, _| {
            let pair = messages[messages.len() - 2].text();
            let verdict = if pair.starts_with("Response 0: x") {
                "Better Response: [[0]]"
            } else if pair == "Response 0: y\n\nResponse 1: z" {
                "Better Response: [[0]]"
            } else {
                "Better Response: [[1]]"
            };
            Ok(verdict.to_string())
        }));
        let rater = RateCandidatesUseCase::new(judge.clone());

        let outcome = rater
            .execute(&candidates(&["x", "y", "z"]), &"Q?".into(), RatingMode::Pairwise)
            .await
            .unwrap();

        assert_eq!(
            outcome.ratings,
            vec![Rating::Wins(2), Rating::Wins(1), Rating::Wins(0)]
        );
        assert_eq!(outcome.selected, 0);
        assert_eq!(judge.call_count(), 3);
    }

    #[tokio::test]
    async fn test_pairwise_second_listed_wins() {
        let judge = Arc::new(ScriptedModel::constant("judge", "Better Response: [[1]]"));
        let rater = RateCandidatesUseCase::new(judge);

        let outcome = rater
            .execute(&candidates(&["x", "y"]), &"Q?".into(), RatingMode::Pairwise)
            .await
            .unwrap();
        assert_eq!(outcome.selected, 1);
    }

    #[tokio::test]
    async fn test_pairwise_unparsable_awards_nothing() {
        let judge = Arc::new(ScriptedModel::constant("judge", "they are both fine"));
        let rater = RateCandidatesUseCase::new(judge);

        let outcome = rater
            .execute(&candidates(&["x", "y", "z"]), &"Q?".into(), RatingMode::Pairwise)
            .await
            .unwrap();
        assert_eq!(
            outcome.ratings,
            vec![Rating::Wins(0), Rating::Wins(0), Rating::Wins(0)]
        );
        assert_eq!(outcome.selected, 0);
    }

    // ==================== Edge cases ====================

    #[tokio::test]
    async fn test_single_candidate_needs_no_judge() {
        let judge = Arc::new(ScriptedModel::constant("judge", "Rating: [[5]]"));
        let rater = RateCandidatesUseCase::new(judge.clone());

        let outcome = rater
            .execute(&candidates(&["only"]), &"Q?".into(), RatingMode::Pairwise)
            .await
            .unwrap();
        assert_eq!(outcome.selected, 0);
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let judge = Arc::new(ScriptedModel::constant("judge", ""));
        let rater = RateCandidatesUseCase::new(judge);
        let err = rater
            .execute(&[], &"Q?".into(), RatingMode::Absolute)
            .await
            .unwrap_err();
        assert!(matches!(err, RatingError::NoCandidates));
    }

    #[tokio::test]
    async fn test_judge_failure_propagates() {
        let judge = Arc::new(ScriptedModel::new("judge", |_, _| {
            Err(GatewayError::ConnectionError("refused".into()))
        }));
        let rater = RateCandidatesUseCase::new(judge);
        let err = rater
            .execute(&candidates(&["a", "b"]), &"Q?".into(), RatingMode::Absolute)
            .await
            .unwrap_err();
        assert!(matches!(err, RatingError::Judge { .. }));
    }
}
