//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod engines;
mod logging;
mod providers;

pub use engines::{FileBestOfNConfig, FileDebateConfig, FileSelectionConfig, FileTiersConfig};
pub use logging::FileLoggingConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};

use ensemble_application::PricingTable;
use ensemble_domain::EnsembleSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A problem found by [`FileConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("providers.{provider}.timeout_seconds cannot be 0")]
    InvalidTimeout { provider: String },

    #[error("{field}: model id cannot be empty")]
    EmptyModelName { field: String },

    #[error("debate.ensemble: {0}")]
    InvalidEnsemble(String),

    #[error("best_of_n.{field} must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("best_of_n.planning_m ({planning_m}) must be >= planning_n ({planning_n})")]
    AttemptBudgetTooSmall { planning_n: usize, planning_m: usize },

    #[error("file_selection.max_iterations must be at least 1")]
    ZeroIterations,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// OpenAI-compatible endpoints keyed by model id prefix
    pub providers: FileProvidersConfig,
    /// Per-model pricing for cost accounting
    pub pricing: PricingTable,
    /// Models per capability tier
    pub tiers: FileTiersConfig,
    pub debate: FileDebateConfig,
    pub best_of_n: FileBestOfNConfig,
    pub file_selection: FileSelectionConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        for (name, provider) in self.providers.iter() {
            if provider.timeout_seconds == 0 {
                issues.push(ConfigValidationError::InvalidTimeout {
                    provider: name.clone(),
                });
            }
        }

        let model_fields = [
            ("tiers.easy", self.tiers.easy.as_deref()),
            ("tiers.medium", self.tiers.medium.as_deref()),
            ("tiers.hard", self.tiers.hard.as_deref()),
            ("best_of_n.model", self.best_of_n.model.as_deref()),
            ("file_selection.model", self.file_selection.model.as_deref()),
        ];
        for (field, value) in model_fields {
            if let Some(id) = value
                && id.trim().is_empty()
            {
                issues.push(ConfigValidationError::EmptyModelName {
                    field: field.to_string(),
                });
            }
        }

        if let Some(spec) = &self.debate.ensemble
            && let Err(e) = EnsembleSpec::parse(spec)
        {
            issues.push(ConfigValidationError::InvalidEnsemble(e.to_string()));
        }

        let counts = [
            ("bestofn_n", self.best_of_n.bestofn_n),
            ("planning_n", self.best_of_n.planning_n),
            ("planning_m", self.best_of_n.planning_m),
        ];
        for (field, value) in counts {
            if value == 0 {
                issues.push(ConfigValidationError::ZeroCount { field });
            }
        }
        if self.best_of_n.planning_n > 0 && self.best_of_n.planning_m < self.best_of_n.planning_n {
            issues.push(ConfigValidationError::AttemptBudgetTooSmall {
                planning_n: self.best_of_n.planning_n,
                planning_m: self.best_of_n.planning_m,
            });
        }

        if self.file_selection.max_iterations == 0 {
            issues.push(ConfigValidationError::ZeroIterations);
        }

        issues
    }
}
