//! Orchestration domain
//!
//! Vocabulary shared by the engines for reporting where a run is.

pub mod phase;

pub use phase::Phase;
