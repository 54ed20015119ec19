//! Instructor selection.
//!
//! Scores every eligible instructor for a (format, slot) pair through
//! additive affinity bonuses and returns the highest. Ineligible
//! instructors never score; ties keep the earliest roster entry, so a
//! fixed roster ordering fixes the outcome.
//!
//! # Bonuses
//! - +100 best historical average for the exact slot key
//! - +50 peak slot taught by a senior
//! - +40 already working this location today
//! - +30 no opposite-shift class today
//! - +20 well under the weekly hour cap
//! - +15 already working this shift today

use crate::constraints::ConstraintEngine;
use crate::models::{Instructor, ScheduledAssignment, Shift};
use crate::state::AllocationState;
use crate::stats::PerformanceIndex;

const BONUS_BEST_HISTORY: f64 = 100.0;
const BONUS_PEAK_SENIOR: f64 = 50.0;
const BONUS_SAME_LOCATION: f64 = 40.0;
const BONUS_NO_SHIFT_CONFLICT: f64 = 30.0;
const BONUS_UNDER_UTILIZED: f64 = 20.0;
const BONUS_SAME_SHIFT: f64 = 15.0;

const EPSILON: f64 = 1e-9;

/// Picks the best eligible instructor for a drafted assignment.
pub struct InstructorSelector<'a> {
    index: &'a PerformanceIndex,
    engine: &'a ConstraintEngine<'a>,
}

impl<'a> InstructorSelector<'a> {
    /// Creates a selector.
    pub fn new(index: &'a PerformanceIndex, engine: &'a ConstraintEngine<'a>) -> Self {
        Self { index, engine }
    }

    /// The highest-scoring eligible instructor, or `None` when nobody
    /// passes the constraint checks. The draft's own instructor field is
    /// ignored; eligibility comes from each candidate in turn.
    pub fn select<'r>(
        &self,
        state: &AllocationState,
        roster: &'r [Instructor],
        draft: &ScheduledAssignment,
    ) -> Option<&'r Instructor> {
        let mut best: Option<(&Instructor, f64)> = None;
        for instructor in roster {
            if self.engine.check_instructor(state, instructor, draft).is_err() {
                continue;
            }
            let score = self.score(state, instructor, draft);
            match best {
                None => best = Some((instructor, score)),
                Some((_, top)) if score > top + EPSILON => best = Some((instructor, score)),
                _ => {}
            }
        }
        best.map(|(instructor, _)| instructor)
    }

    /// Affinity score for one instructor. Assumes eligibility was
    /// already established.
    pub fn score(
        &self,
        state: &AllocationState,
        instructor: &Instructor,
        draft: &ScheduledAssignment,
    ) -> f64 {
        let config = self.engine.config();
        let day = draft.day;
        let shift = Shift::of(draft.start_min);
        let mut score = 0.0;

        if self
            .index
            .best_instructor_for(&draft.format, &draft.location, day, draft.start_min)
            .as_deref()
            == Some(instructor.name.as_str())
        {
            score += BONUS_BEST_HISTORY;
        }
        if config.is_peak(draft.start_min) && instructor.is_senior() {
            score += BONUS_PEAK_SENIOR;
        }

        let fresh = crate::state::InstructorLoad::default();
        let load = state.load(&instructor.name).unwrap_or(&fresh);

        if load.location_on(day) == Some(draft.location.as_str()) {
            score += BONUS_SAME_LOCATION;
        }
        let conflicted = shift
            .opposite()
            .is_some_and(|opposite| load.shift_worked(day, opposite));
        if !conflicted {
            score += BONUS_NO_SHIFT_CONFLICT;
        }
        if instructor.tier.weekly_cap_min() - load.week_min > config.topup_margin_min {
            score += BONUS_UNDER_UTILIZED;
        }
        if load.shift_worked(day, shift) {
            score += BONUS_SAME_SHIFT;
        }
        score
    }
}
