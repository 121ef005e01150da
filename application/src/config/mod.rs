//! Application-level configuration.
//!
//! - [`ModelPricing`] / [`PricingTable`]: per-model prices for cost accounting

pub mod pricing;

pub use pricing::{ModelPricing, PricingTable};
