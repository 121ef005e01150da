//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`] / [`model::ModelTier`]: model identifiers and tiers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod string;
