//! Best-of-N planning domain.
//!
//! Each candidate is produced by a fixed pipeline:
//!
//! 1. **Plan**: step-by-step plan with per-step confidence, no answer
//! 2. **Execute**: carry out the plan (1-2 repeated until `planning_n`
//!    pairs exist or `planning_m` attempts are spent)
//! 3. **Refine**: reconcile all executions into one plan
//! 4. **Finalize**: answer from the refined plan
//!
//! `bestofn_n` candidates are then rated and the best one is returned.

pub mod config;

pub use config::BestOfNConfig;
