//! Scheduled assignments and the weekly schedule container.
//!
//! [`ScheduledAssignment`] is the output unit: one class placed at a
//! (location, day, start) slot with an instructor and predicted demand.
//! [`WeeklySchedule`] collects the committed assignments plus the
//! [`SlotSkip`] records describing slots the builder had to leave empty.
//! A partial week is a valid result; skips tell the caller why.

use serde::{Deserialize, Serialize};

use super::{fmt_minute, Shift, Weekday};

/// One planned class in the output week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledAssignment {
    /// Class format.
    pub format: String,
    /// Location name.
    pub location: String,
    /// Day of week.
    pub day: Weekday,
    /// Start minute of day.
    pub start_min: i32,
    /// Duration in minutes.
    pub duration_min: i32,
    /// Assigned instructor name.
    pub instructor: String,
    /// Predicted participant count (one decimal).
    pub predicted_participants: f64,
    /// Predicted revenue (one decimal).
    pub predicted_revenue: f64,
    /// Slot history marks this as a proven top draw.
    pub top_performer: bool,
    /// Private session: exempt from the restricted midday window.
    pub private: bool,
    /// Locked assignments are committed as-is and never displaced.
    pub locked: bool,
}

impl ScheduledAssignment {
    /// Creates an assignment with zeroed predictions and no flags.
    pub fn new(
        format: impl Into<String>,
        location: impl Into<String>,
        day: Weekday,
        start_min: i32,
        duration_min: i32,
        instructor: impl Into<String>,
    ) -> Self {
        Self {
            format: format.into(),
            location: location.into(),
            day,
            start_min,
            duration_min,
            instructor: instructor.into(),
            predicted_participants: 0.0,
            predicted_revenue: 0.0,
            top_performer: false,
            private: false,
            locked: false,
        }
    }

    /// Sets predicted participants and revenue.
    pub fn with_predictions(mut self, participants: f64, revenue: f64) -> Self {
        self.predicted_participants = participants;
        self.predicted_revenue = revenue;
        self
    }

    /// Marks the assignment as a private session.
    pub fn private_session(mut self) -> Self {
        self.private = true;
        self
    }

    /// Marks the assignment as locked.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Flags the assignment as a historical top performer.
    pub fn top_performer(mut self) -> Self {
        self.top_performer = true;
        self
    }

    /// End minute (exclusive).
    #[inline]
    pub fn end_min(&self) -> i32 {
        self.start_min + self.duration_min
    }

    /// Shift of the start minute.
    #[inline]
    pub fn shift(&self) -> Shift {
        Shift::of(self.start_min)
    }

    /// Whether two assignments overlap in time on the same day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start_min < other.end_min() && other.start_min < self.end_min()
    }
}

/// Why the builder left a slot empty. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SkipReason {
    /// No format survived filtering for the slot.
    #[error("no candidate format")]
    NoCandidateFormat,
    /// A format was ranked but nobody could teach it.
    #[error("no eligible instructor")]
    NoEligibleInstructor,
    /// The day's class cap is already met.
    #[error("day class cap reached")]
    DayCapReached,
    /// The slot start sits inside the restricted public window.
    #[error("restricted window")]
    RestrictedWindow,
    /// A configured must-run assignment failed its checks.
    #[error("seed rejected")]
    SeedRejected,
}

/// Record of a slot the builder could not fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSkip {
    /// Day of the skipped slot.
    pub day: Weekday,
    /// Location of the skipped slot.
    pub location: String,
    /// Start minute of the skipped slot.
    pub start_min: i32,
    /// Skip category.
    pub reason: SkipReason,
    /// Human-readable detail.
    pub detail: String,
}

impl SlotSkip {
    /// No candidate format survived filtering.
    pub fn no_candidate(day: Weekday, location: impl Into<String>, start_min: i32) -> Self {
        Self {
            day,
            location: location.into(),
            start_min,
            reason: SkipReason::NoCandidateFormat,
            detail: "no format passed the candidate filters".to_string(),
        }
    }

    /// No instructor was eligible for the chosen format.
    pub fn no_instructor(
        day: Weekday,
        location: impl Into<String>,
        start_min: i32,
        format: &str,
    ) -> Self {
        Self {
            day,
            location: location.into(),
            start_min,
            reason: SkipReason::NoEligibleInstructor,
            detail: format!("no eligible instructor for {format}"),
        }
    }

    /// The day-level class cap blocked further placements.
    pub fn day_cap(day: Weekday, location: impl Into<String>, start_min: i32, cap: usize) -> Self {
        Self {
            day,
            location: location.into(),
            start_min,
            reason: SkipReason::DayCapReached,
            detail: format!("day already holds {cap} classes"),
        }
    }

    /// Public classes may not start at this time.
    pub fn restricted(day: Weekday, location: impl Into<String>, start_min: i32) -> Self {
        Self {
            day,
            location: location.into(),
            start_min,
            reason: SkipReason::RestrictedWindow,
            detail: "time reserved for private sessions".to_string(),
        }
    }

    /// A must-run seed failed validation.
    pub fn seed_rejected(
        day: Weekday,
        location: impl Into<String>,
        start_min: i32,
        why: impl Into<String>,
    ) -> Self {
        Self {
            day,
            location: location.into(),
            start_min,
            reason: SkipReason::SeedRejected,
            detail: why.into(),
        }
    }
}

impl std::fmt::Display for SlotSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} @ {}: {} ({})",
            self.day,
            fmt_minute(self.start_min),
            self.location,
            self.reason,
            self.detail
        )
    }
}

/// A constructed week: committed assignments plus skip records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySchedule {
    /// Committed assignments in chronological order.
    pub assignments: Vec<ScheduledAssignment>,
    /// Slots the builder could not fill, with reasons.
    pub skips: Vec<SlotSkip>,
}

impl WeeklySchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: ScheduledAssignment) {
        self.assignments.push(assignment);
    }

    /// Adds a skip record.
    pub fn add_skip(&mut self, skip: SlotSkip) {
        self.skips.push(skip);
    }

    /// Number of committed assignments.
    #[inline]
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// All assignments on a day.
    pub fn assignments_for_day(&self, day: Weekday) -> Vec<&ScheduledAssignment> {
        self.assignments.iter().filter(|a| a.day == day).collect()
    }

    /// All assignments taught by an instructor.
    pub fn assignments_for_instructor(&self, name: &str) -> Vec<&ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.instructor == name)
            .collect()
    }

    /// All assignments at a (location, day).
    pub fn assignments_at(&self, location: &str, day: Weekday) -> Vec<&ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.location == location && a.day == day)
            .collect()
    }

    /// Sorts assignments chronologically: day, start, location, format.
    pub fn sort_chronological(&mut self) {
        self.assignments.sort_by(|a, b| {
            (a.day, a.start_min, &a.location, &a.format)
                .cmp(&(b.day, b.start_min, &b.location, &b.format))
        });
    }
}
