//! Debate ensemble domain
//!
//! Pure pieces of the multi-agent debate: who takes part
//! ([`EnsembleSpec`]), who talks to whom ([`RingTopology`]) and what each
//! round produced ([`Candidate`], [`DebateRound`], [`DebateOutcome`]).
//!
//! ```text
//!  round 0          round 1..R-1                 mediation
//!  ┌─────┐        ┌────────────────────┐        ┌──────────┐
//!  │ m0  │──┐     │ m_i sees m_{i-1},  │        │ mediator │
//!  │ m1  │──┼───▶ │ m_i, m_{i+1}       │──────▶ │ merges N │──▶ answer
//!  │ ... │──┘     │ (ring neighbours)  │        │ answers  │
//!  └─────┘        └────────────────────┘        └──────────┘
//! ```

pub mod candidate;
pub mod settings;
pub mod spec;
pub mod topology;

pub use candidate::{Candidate, DebateOutcome, DebateRound};
pub use settings::DebateSettings;
pub use spec::EnsembleSpec;
pub use topology::RingTopology;
