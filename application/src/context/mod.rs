//! Run context: tiered models, usage accounting and call metering.

pub mod metered;
pub mod run_context;
pub mod usage;

pub use metered::MeteredModel;
pub use run_context::{ModelTiers, RunContext};
pub use usage::{UsageTotals, UsageTracker};
