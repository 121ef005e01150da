//! Application use cases
//!
//! Each use case orchestrates one strategy over the [`LanguageModel`]
//! port. Debate and best-of-N also expose themselves as models so they can
//! be nested or registered by id.
//!
//! [`LanguageModel`]: crate::ports::llm_gateway::LanguageModel

pub mod rate_candidates;
pub mod run_best_of_n;
pub mod run_debate;
pub mod select_files;

#[cfg(test)]
pub(crate) mod test_support;
