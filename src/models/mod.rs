//! Studio scheduling domain models.
//!
//! Core data types for the weekly timetable problem: the historical
//! record the engine learns from, the instructor and location rosters it
//! plans against, and the assignments it produces.
//!
//! # Conventions
//!
//! Times of day are minutes since midnight; durations are minutes.
//! Entity types are immutable value objects with builder-style
//! constructors. Everything derives serde so record sets, rosters and
//! finished schedules round-trip through JSON.

mod assignment;
mod instructor;
mod location;
mod objective;
mod record;
mod time;

pub use assignment::{ScheduledAssignment, SkipReason, SlotSkip, WeeklySchedule};
pub use instructor::{Instructor, InstructorTier};
pub use location::Location;
pub use objective::Objective;
pub use record::ClassRecord;
pub use time::{fmt_minute, in_any_window, minute, Shift, Weekday, HOUR_MIN};
