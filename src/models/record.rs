//! Historical class records.
//!
//! A [`ClassRecord`] is one delivered class from past weeks: what ran,
//! where, when, who taught it, and how it performed. Records are
//! immutable facts; the engine only ever reads them.

use serde::{Deserialize, Serialize};

use super::Weekday;

/// One historical class occurrence with its outcome metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassRecord {
    /// Class format, e.g. "HIIT Burn" or "Yoga Flow".
    pub format: String,
    /// Location where the class ran.
    pub location: String,
    /// Day of week.
    pub day: Weekday,
    /// Start minute of day.
    pub start_min: i32,
    /// Instructor who taught it.
    pub instructor: String,
    /// Booked participants.
    pub participants: u32,
    /// Participants who actually checked in.
    pub checked_in: u32,
    /// Revenue attributed to the class.
    pub revenue: f64,
    /// Bookings cancelled inside the late-cancel window.
    pub late_cancellations: u32,
    /// Hosted (non-bookable) sessions carry no booking signal and are
    /// excluded from all performance statistics.
    pub hosted: bool,
}

impl ClassRecord {
    /// Creates a record with zeroed metrics.
    pub fn new(
        format: impl Into<String>,
        location: impl Into<String>,
        day: Weekday,
        start_min: i32,
        instructor: impl Into<String>,
    ) -> Self {
        Self {
            format: format.into(),
            location: location.into(),
            day,
            start_min,
            instructor: instructor.into(),
            participants: 0,
            checked_in: 0,
            revenue: 0.0,
            late_cancellations: 0,
            hosted: false,
        }
    }

    /// Sets participant and check-in counts.
    pub fn with_attendance(mut self, participants: u32, checked_in: u32) -> Self {
        self.participants = participants;
        self.checked_in = checked_in;
        self
    }

    /// Sets attributed revenue.
    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = revenue;
        self
    }

    /// Sets the late-cancellation count.
    pub fn with_late_cancellations(mut self, count: u32) -> Self {
        self.late_cancellations = count;
        self
    }

    /// Marks the record as a hosted (non-bookable) session.
    pub fn hosted(mut self) -> Self {
        self.hosted = true;
        self
    }

    /// Whether this record matches a slot key.
    pub fn matches_slot(&self, location: &str, day: Weekday, start_min: i32) -> bool {
        self.location == location && self.day == day && self.start_min == start_min
    }
}
