//! Per-model pricing used for cost accounting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price of a model in currency units per million characters.
///
/// Characters rather than tokens: the engines never see tokenizer output,
/// and a per-character rate is accurate enough for run budgeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPricing {
    pub input_per_million_chars: f64,
    pub output_per_million_chars: f64,
}

impl ModelPricing {
    pub fn new(input_per_million_chars: f64, output_per_million_chars: f64) -> Self {
        Self {
            input_per_million_chars,
            output_per_million_chars,
        }
    }

    pub fn cost(&self, chars_in: usize, chars_out: usize) -> f64 {
        (chars_in as f64 * self.input_per_million_chars
            + chars_out as f64 * self.output_per_million_chars)
            / 1_000_000.0
    }
}

/// Pricing keyed by model id. Unknown models cost nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable(HashMap<String, ModelPricing>);

impl PricingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.0.insert(model.into(), pricing);
        self
    }

    pub fn for_model(&self, model: &str) -> ModelPricing {
        self.0.get(model).copied().unwrap_or_default()
    }
}

impl From<HashMap<String, ModelPricing>> for PricingTable {
    fn from(map: HashMap<String, ModelPricing>) -> Self {
        Self(map)
    }
}
