//! Mutable allocation state during construction.
//!
//! [`AllocationState`] is the single tracker of everything committed so
//! far: room occupancy per (location, day, sub-slot) and per-instructor
//! load counters. The builder passes it by reference through the
//! construction phases; the constraint engine only ever reads it.
//! Rebuilding the state from an existing assignment slice makes the same
//! checks available for validating manual edits.
//!
//! # Occupancy model
//! Capacity is accounted in fixed-length sub-slots (default 30 minutes).
//! An assignment occupies every sub-slot it touches, so a 45-minute
//! class starting on the half hour occupies two.

use std::collections::HashMap;

use crate::models::{ScheduledAssignment, Shift, Weekday};

/// Per-day occupancy counts keyed by sub-slot start minute.
type DayGrid = [HashMap<i32, u32>; 7];

/// Committed load of one instructor.
#[derive(Debug, Clone, Default)]
pub struct InstructorLoad {
    /// Total assigned minutes this week.
    pub week_min: i32,
    day_min: [i32; 7],
    day_classes: [usize; 7],
    day_location: [Option<String>; 7],
    day_intervals: [Vec<(i32, i32)>; 7],
}

impl InstructorLoad {
    /// Assigned minutes on a day.
    #[inline]
    pub fn day_minutes(&self, day: Weekday) -> i32 {
        self.day_min[day.index()]
    }

    /// Classes committed on a day.
    #[inline]
    pub fn day_class_count(&self, day: Weekday) -> usize {
        self.day_classes[day.index()]
    }

    /// The location worked on a day, if any.
    pub fn location_on(&self, day: Weekday) -> Option<&str> {
        self.day_location[day.index()].as_deref()
    }

    /// Sorted (start, end) intervals taught on a day.
    pub fn intervals_on(&self, day: Weekday) -> &[(i32, i32)] {
        &self.day_intervals[day.index()]
    }

    /// Number of days with at least one class.
    pub fn worked_days(&self) -> usize {
        self.day_classes.iter().filter(|&&n| n > 0).count()
    }

    /// Whether the day already has a class, period.
    #[inline]
    pub fn works_on(&self, day: Weekday) -> bool {
        self.day_classes[day.index()] > 0
    }

    /// Whether any class on the day starts in the given shift.
    pub fn shift_worked(&self, day: Weekday, shift: Shift) -> bool {
        self.day_intervals[day.index()]
            .iter()
            .any(|&(start, _)| Shift::of(start) == shift)
    }

    fn record(&mut self, day: Weekday, start_min: i32, duration_min: i32, location: &str) {
        let i = day.index();
        self.week_min += duration_min;
        self.day_min[i] += duration_min;
        self.day_classes[i] += 1;
        if self.day_location[i].is_none() {
            self.day_location[i] = Some(location.to_string());
        }
        self.day_intervals[i].push((start_min, start_min + duration_min));
        self.day_intervals[i].sort_unstable();
    }
}

/// Everything committed so far in one construction run.
#[derive(Debug, Clone)]
pub struct AllocationState {
    occupancy: HashMap<String, DayGrid>,
    loads: HashMap<String, InstructorLoad>,
    day_totals: [usize; 7],
    subslot_min: i32,
}

impl AllocationState {
    /// Creates an empty state with the given sub-slot length.
    pub fn new(subslot_min: i32) -> Self {
        Self {
            occupancy: HashMap::new(),
            loads: HashMap::new(),
            day_totals: [0; 7],
            subslot_min,
        }
    }

    /// Rebuilds state from an existing assignment slice.
    pub fn from_assignments(assignments: &[ScheduledAssignment], subslot_min: i32) -> Self {
        let mut state = Self::new(subslot_min);
        for assignment in assignments {
            state.commit(assignment);
        }
        state
    }

    /// Sub-slot starts an interval touches.
    pub fn spanned_subslots(&self, start_min: i32, duration_min: i32) -> Vec<i32> {
        let mut spans = Vec::new();
        let mut sub = start_min - start_min.rem_euclid(self.subslot_min);
        while sub < start_min + duration_min {
            spans.push(sub);
            sub += self.subslot_min;
        }
        spans
    }

    /// Records an assignment into occupancy and load counters.
    pub fn commit(&mut self, assignment: &ScheduledAssignment) {
        let spans = self.spanned_subslots(assignment.start_min, assignment.duration_min);
        let grid = self
            .occupancy
            .entry(assignment.location.clone())
            .or_default();
        for sub in spans {
            *grid[assignment.day.index()].entry(sub).or_insert(0) += 1;
        }

        self.loads
            .entry(assignment.instructor.clone())
            .or_default()
            .record(
                assignment.day,
                assignment.start_min,
                assignment.duration_min,
                &assignment.location,
            );
        self.day_totals[assignment.day.index()] += 1;
    }

    /// Occupancy count at one sub-slot.
    pub fn occupancy_at(&self, location: &str, day: Weekday, subslot: i32) -> u32 {
        self.occupancy
            .get(location)
            .map_or(0, |grid| grid[day.index()].get(&subslot).copied().unwrap_or(0))
    }

    /// Highest occupancy across the sub-slots an interval touches.
    pub fn peak_occupancy(
        &self,
        location: &str,
        day: Weekday,
        start_min: i32,
        duration_min: i32,
    ) -> u32 {
        self.spanned_subslots(start_min, duration_min)
            .iter()
            .map(|&sub| self.occupancy_at(location, day, sub))
            .max()
            .unwrap_or(0)
    }

    /// Load counters for an instructor, if any were committed.
    pub fn load(&self, instructor: &str) -> Option<&InstructorLoad> {
        self.loads.get(instructor)
    }

    /// Total classes committed on a day across all locations.
    #[inline]
    pub fn day_total(&self, day: Weekday) -> usize {
        self.day_totals[day.index()]
    }
}
