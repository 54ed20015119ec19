//! Weekly class timetable engine for fitness studios.
//!
//! Builds a week of class assignments from historical performance data:
//! formats are ranked per slot by revenue or attendance, instructors are
//! chosen by an additive bonus score, and every placement passes a hard
//! constraint check before it is committed. Manual edits go through the
//! same rules via [`validator::AssignmentValidator`].
//!
//! # Modules
//!
//! - [`models`]: domain types (`ClassRecord`, `Instructor`, `Location`,
//!   `ScheduledAssignment`, `WeeklySchedule`, time helpers)
//! - [`config`]: all tunable business rules as data (operating hours,
//!   caps, windows, priority and avoid lists, seed assignments)
//! - [`stats`]: `PerformanceIndex`, averages over the historical records
//! - [`state`]: `AllocationState`, occupancy grid and instructor loads
//! - [`constraints`]: `ConstraintEngine`, every feasibility rule as a
//!   side-effect-free predicate
//! - [`scoring`]: `CandidateRanker` and `InstructorSelector`
//! - [`builder`]: `ScheduleBuilder`, the four-phase greedy construction
//! - [`validator`]: `AssignmentValidator`, hard and soft checks for
//!   manual edits
//! - [`validation`]: input integrity checks before construction
//! - [`kpi`]: summary metrics over a built week
//!
//! # Architecture
//!
//! Data flows one way: records feed the `PerformanceIndex`, the ranker
//! and selector read it, the builder commits assignments into an
//! `AllocationState`, and the finished `WeeklySchedule` is plain data.
//! The validator reuses the same `ConstraintEngine` against a schedule
//! snapshot, so interactive edits and batch construction can never
//! disagree about the rules.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Haupt (1989), "A survey of priority rule-based scheduling"

pub mod builder;
pub mod config;
pub mod constraints;
pub mod kpi;
pub mod models;
pub mod scoring;
pub mod state;
pub mod stats;
pub mod validation;
pub mod validator;
