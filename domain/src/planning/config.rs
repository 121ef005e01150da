//! Best-of-N planning configuration.

use crate::core::error::DomainError;
use crate::rating::RatingMode;
use serde::{Deserialize, Serialize};

/// Settings for the plan → execute → refine → finalize pipeline and the
/// best-of-N selection that runs on top of it.
///
/// # Example
///
/// ```
/// use ensemble_domain::planning::BestOfNConfig;
/// use ensemble_domain::rating::RatingMode;
///
/// let config = BestOfNConfig::default()
///     .with_candidates(5)
///     .with_rating_mode(RatingMode::Pairwise);
/// assert_eq!(config.bestofn_n, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestOfNConfig {
    /// Number of independent final-answer candidates.
    pub bestofn_n: usize,
    /// Temperature of the rating calls.
    pub bestofn_temperature: f32,
    pub bestofn_max_tokens: u32,
    pub bestofn_rating_type: RatingMode,
    /// Plan/execute pairs wanted per candidate.
    pub planning_n: usize,
    /// Attempt budget for collecting `planning_n` pairs.
    pub planning_m: usize,
    pub planning_temperature_step1: f32,
    pub planning_temperature_step2: f32,
    pub planning_temperature_step3: f32,
    pub planning_temperature_step4: f32,
    pub planning_max_tokens_step1: u32,
    pub planning_max_tokens_step2: u32,
    pub planning_max_tokens_step3: u32,
    pub planning_max_tokens_step4: u32,
    /// Run the `bestofn_n` pipelines concurrently.
    pub parallel_candidates: bool,
}

impl Default for BestOfNConfig {
    fn default() -> Self {
        Self {
            bestofn_n: 3,
            bestofn_temperature: 0.1,
            bestofn_max_tokens: 4096,
            bestofn_rating_type: RatingMode::Absolute,
            planning_n: 3,
            planning_m: 6,
            planning_temperature_step1: 0.55,
            planning_temperature_step2: 0.25,
            planning_temperature_step3: 0.1,
            planning_temperature_step4: 0.0,
            planning_max_tokens_step1: 4096,
            planning_max_tokens_step2: 4096,
            planning_max_tokens_step3: 4096,
            planning_max_tokens_step4: 4096,
            parallel_candidates: true,
        }
    }
}

impl BestOfNConfig {
    pub fn with_candidates(mut self, n: usize) -> Self {
        self.bestofn_n = n;
        self
    }

    pub fn with_rating_mode(mut self, mode: RatingMode) -> Self {
        self.bestofn_rating_type = mode;
        self
    }

    pub fn with_planning(mut self, n: usize, m: usize) -> Self {
        self.planning_n = n;
        self.planning_m = m;
        self
    }

    pub fn with_parallel_candidates(mut self, parallel: bool) -> Self {
        self.parallel_candidates = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.bestofn_n == 0 {
            return Err(DomainError::InvalidConfig("bestofn_n must be at least 1".into()));
        }
        if self.planning_n == 0 {
            return Err(DomainError::InvalidConfig("planning_n must be at least 1".into()));
        }
        if self.planning_m < self.planning_n {
            return Err(DomainError::InvalidConfig(format!(
                "planning_m ({}) must be >= planning_n ({})",
                self.planning_m, self.planning_n
            )));
        }
        Ok(())
    }
}
