//! Slot scoring: what to run, and who teaches it.
//!
//! Two score-based stages fill each slot. [`CandidateRanker`] ranks the
//! formats with history at the slot under the active objective;
//! [`InstructorSelector`] picks the best eligible instructor for the
//! winning format through additive affinity bonuses. Both stages are
//! deterministic: equal inputs produce equal rankings, with explicit
//! tie-breaks (format name, roster order).
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod ranker;
mod selector;

pub use ranker::{CandidateRanker, FormatCandidate};
pub use selector::InstructorSelector;
