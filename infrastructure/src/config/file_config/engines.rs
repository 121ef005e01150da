//! Engine settings (`[tiers]`, `[debate]`, `[best_of_n]`, `[file_selection]`)

use ensemble_domain::rating::RatingMode;
use ensemble_domain::selection::DEFAULT_MAX_ITERATIONS;
use ensemble_domain::{BestOfNConfig, DebateSettings, ModelTier};
use serde::{Deserialize, Serialize};

/// Model ids per capability tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTiersConfig {
    pub easy: Option<String>,
    pub medium: Option<String>,
    pub hard: Option<String>,
}

impl FileTiersConfig {
    pub fn get(&self, tier: ModelTier) -> Option<&str> {
        match tier {
            ModelTier::Easy => self.easy.as_deref(),
            ModelTier::Medium => self.medium.as_deref(),
            ModelTier::Hard => self.hard.as_deref(),
        }
    }

    /// Id for `tier`, falling back to the nearest configured tier.
    pub fn resolve(&self, tier: ModelTier) -> Option<&str> {
        let order: &[ModelTier] = match tier {
            ModelTier::Easy => &[ModelTier::Easy, ModelTier::Medium, ModelTier::Hard],
            ModelTier::Medium => &[ModelTier::Medium, ModelTier::Hard, ModelTier::Easy],
            ModelTier::Hard => &[ModelTier::Hard, ModelTier::Medium, ModelTier::Easy],
        };
        order.iter().find_map(|t| self.get(*t))
    }
}

/// `[debate]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// `mediator|member1|member2...`
    pub ensemble: Option<String>,
    /// No default: must come from here or the command line.
    pub rounds: Option<usize>,
    pub initial_temperature: f32,
    pub mediator_temperature: f32,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            ensemble: None,
            rounds: None,
            initial_temperature: DebateSettings::DEFAULT_INITIAL_TEMPERATURE,
            mediator_temperature: DebateSettings::DEFAULT_MEDIATOR_TEMPERATURE,
        }
    }
}

impl FileDebateConfig {
    /// Settings for a run; `None` while `rounds` is unset.
    pub fn settings(&self) -> Option<DebateSettings> {
        self.rounds.map(|rounds| {
            DebateSettings::new(rounds)
                .with_initial_temperature(self.initial_temperature)
                .with_mediator_temperature(self.mediator_temperature)
        })
    }
}

/// `[best_of_n]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBestOfNConfig {
    pub model: Option<String>,
    pub bestofn_n: usize,
    pub rating: RatingMode,
    pub rating_temperature: f32,
    pub rating_max_tokens: u32,
    pub planning_n: usize,
    pub planning_m: usize,
    /// Plan, execute, refine and final-answer temperatures.
    pub step_temperatures: [f32; 4],
    pub step_max_tokens: [u32; 4],
    pub parallel_candidates: bool,
}

impl Default for FileBestOfNConfig {
    fn default() -> Self {
        Self::from_config(&BestOfNConfig::default())
    }
}

impl FileBestOfNConfig {
    fn from_config(c: &BestOfNConfig) -> Self {
        Self {
            model: None,
            bestofn_n: c.bestofn_n,
            rating: c.bestofn_rating_type,
            rating_temperature: c.bestofn_temperature,
            rating_max_tokens: c.bestofn_max_tokens,
            planning_n: c.planning_n,
            planning_m: c.planning_m,
            step_temperatures: [
                c.planning_temperature_step1,
                c.planning_temperature_step2,
                c.planning_temperature_step3,
                c.planning_temperature_step4,
            ],
            step_max_tokens: [
                c.planning_max_tokens_step1,
                c.planning_max_tokens_step2,
                c.planning_max_tokens_step3,
                c.planning_max_tokens_step4,
            ],
            parallel_candidates: c.parallel_candidates,
        }
    }

    pub fn to_config(&self) -> BestOfNConfig {
        let [t1, t2, t3, t4] = self.step_temperatures;
        let [m1, m2, m3, m4] = self.step_max_tokens;
        BestOfNConfig {
            bestofn_n: self.bestofn_n,
            bestofn_temperature: self.rating_temperature,
            bestofn_max_tokens: self.rating_max_tokens,
            bestofn_rating_type: self.rating,
            planning_n: self.planning_n,
            planning_m: self.planning_m,
            planning_temperature_step1: t1,
            planning_temperature_step2: t2,
            planning_temperature_step3: t3,
            planning_temperature_step4: t4,
            planning_max_tokens_step1: m1,
            planning_max_tokens_step2: m2,
            planning_max_tokens_step3: m3,
            planning_max_tokens_step4: m4,
            parallel_candidates: self.parallel_candidates,
        }
    }
}

/// `[file_selection]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    /// Tier used when `model` is unset.
    pub tier: ModelTier,
    pub model: Option<String>,
    pub max_iterations: usize,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        Self {
            tier: ModelTier::Medium,
            model: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}
