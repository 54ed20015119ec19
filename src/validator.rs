//! Single-assignment validation for manual schedule edits.
//!
//! [`AssignmentValidator`] replays the constraint rules against a
//! schedule snapshot plus one proposed assignment, without touching
//! either. Hard rules reject outright; the weekly hour cap is reported
//! as an overridable warning, and an instructor close to their cap gets
//! a non-blocking notice. External suggestion sources go through the
//! same path: a proposal is a proposal, wherever it came from.

use log::debug;

use crate::constraints::{ConstraintEngine, ConstraintViolation};
use crate::models::{Instructor, ScheduledAssignment};
use crate::state::AllocationState;

/// Caller choices for a validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Accept a weekly hour overrun the caller has already confirmed.
    pub allow_hour_overrun: bool,
}

/// Outcome of validating one proposed assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Whether the proposal may be committed as-is.
    pub valid: bool,
    /// The broken rule, when one was hit.
    pub violation: Option<ConstraintViolation>,
    /// Human-readable advisory for soft or near-limit conditions.
    pub warning: Option<String>,
    /// Whether re-running with an override would accept the proposal.
    pub overridable: bool,
}

impl ValidationOutcome {
    fn pass() -> Self {
        Self {
            valid: true,
            violation: None,
            warning: None,
            overridable: false,
        }
    }

    fn hard(violation: ConstraintViolation) -> Self {
        Self {
            valid: false,
            violation: Some(violation),
            warning: None,
            overridable: false,
        }
    }

    fn soft(violation: ConstraintViolation) -> Self {
        Self {
            valid: true,
            warning: Some(violation.to_string()),
            violation: Some(violation),
            overridable: true,
        }
    }

    fn notice(warning: String) -> Self {
        Self {
            valid: true,
            violation: None,
            warning: Some(warning),
            overridable: false,
        }
    }
}

/// Validates ad hoc edits with the same engine the builder uses.
pub struct AssignmentValidator<'a> {
    engine: ConstraintEngine<'a>,
}

impl<'a> AssignmentValidator<'a> {
    /// Wraps a constraint engine for interactive checks.
    pub fn new(engine: ConstraintEngine<'a>) -> Self {
        Self { engine }
    }

    /// Validates with default options.
    pub fn validate(
        &self,
        current: &[ScheduledAssignment],
        proposed: &ScheduledAssignment,
        roster: &[Instructor],
    ) -> ValidationOutcome {
        self.validate_with(current, proposed, roster, ValidationOptions::default())
    }

    /// Validates one proposal against a snapshot of the schedule.
    ///
    /// Checks run in the builder's order: capacity, location format
    /// policy, restricted window, then the instructor rules. The weekly
    /// hour cap comes back as an overridable warning instead of a
    /// rejection; everything else is final.
    pub fn validate_with(
        &self,
        current: &[ScheduledAssignment],
        proposed: &ScheduledAssignment,
        roster: &[Instructor],
        options: ValidationOptions,
    ) -> ValidationOutcome {
        let state = AllocationState::from_assignments(current, self.engine.config().subslot_min);

        if let Err(violation) = self.engine.check_capacity(&state, proposed) {
            return ValidationOutcome::hard(violation);
        }
        if let Err(violation) = self
            .engine
            .check_format(&proposed.format, &proposed.location)
        {
            return ValidationOutcome::hard(violation);
        }
        if let Err(violation) =
            self.engine
                .check_time(proposed.day, proposed.start_min, proposed.private)
        {
            return ValidationOutcome::hard(violation);
        }

        let Some(instructor) = roster.iter().find(|i| i.name == proposed.instructor) else {
            return ValidationOutcome::hard(ConstraintViolation::UnknownInstructor {
                instructor: proposed.instructor.clone(),
            });
        };

        match self.engine.check_instructor(&state, instructor, proposed) {
            Ok(()) => {}
            Err(violation @ ConstraintViolation::WeeklyHourLimit { .. }) => {
                if options.allow_hour_overrun {
                    debug!("hour overrun accepted for {}", instructor.name);
                } else {
                    return ValidationOutcome::soft(violation);
                }
            }
            Err(violation) => return ValidationOutcome::hard(violation),
        }

        let cap = instructor.tier.weekly_cap_min();
        let projected = state
            .load(&instructor.name)
            .map_or(0, |load| load.week_min)
            + proposed.duration_min;
        if projected <= cap && cap - projected <= self.engine.config().near_cap_margin_min {
            return ValidationOutcome::notice(format!(
                "{} would reach {projected} of {cap} weekly minutes",
                instructor.name
            ));
        }

        ValidationOutcome::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;
    use crate::models::{minute, Location, Weekday};

    fn locations() -> Vec<Location> {
        vec![Location::new("Downtown", 2), Location::new("Annex", 1)]
    }

    fn roster() -> Vec<Instructor> {
        vec![
            Instructor::senior("Mara"),
            Instructor::standard("Priya"),
            Instructor::new_tier("Theo"),
        ]
    }

    fn class(
        instructor: &str,
        day: Weekday,
        start_min: i32,
        duration_min: i32,
    ) -> ScheduledAssignment {
        ScheduledAssignment::new("Spin", "Downtown", day, start_min, duration_min, instructor)
    }

    /// Five 180-minute days: exactly the 900-minute standard cap.
    fn full_week(instructor: &str) -> Vec<ScheduledAssignment> {
        use Weekday::*;
        let mut current = Vec::new();
        for day in [Monday, Tuesday, Wednesday, Thursday, Friday] {
            current.push(class(instructor, day, minute(6, 0), 60));
            current.push(class(instructor, day, minute(7, 0), 60));
            current.push(class(instructor, day, minute(10, 0), 60));
        }
        current
    }

    #[test]
    fn test_weekly_overrun_is_soft() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let current = full_week("Priya");
        let proposed = class("Priya", Weekday::Monday, minute(16, 0), 60);
        let outcome = validator.validate(&current, &proposed, &roster());

        assert!(outcome.valid);
        assert!(outcome.overridable);
        assert!(matches!(
            outcome.violation,
            Some(ConstraintViolation::WeeklyHourLimit {
                minutes: 960,
                cap: 900,
                ..
            })
        ));
        assert!(outcome.warning.as_deref().is_some_and(|w| w.contains("960")));
    }

    #[test]
    fn test_override_accepts_overrun() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let current = full_week("Priya");
        let proposed = class("Priya", Weekday::Monday, minute(16, 0), 60);
        let outcome = validator.validate_with(
            &current,
            &proposed,
            &roster(),
            ValidationOptions {
                allow_hour_overrun: true,
            },
        );

        assert!(outcome.valid);
        assert!(outcome.violation.is_none());
        assert!(outcome.warning.is_none());
        assert!(!outcome.overridable);
    }

    #[test]
    fn test_tier_whitelist_is_hard() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let proposed = ScheduledAssignment::new(
            "HIIT Burn",
            "Downtown",
            Weekday::Monday,
            minute(9, 0),
            60,
            "Theo",
        );
        let outcome = validator.validate(&[], &proposed, &roster());

        assert!(!outcome.valid);
        assert!(!outcome.overridable);
        assert!(matches!(
            outcome.violation,
            Some(ConstraintViolation::TierWhitelist { .. })
        ));
    }

    #[test]
    fn test_capacity_rejection_ignores_flags() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let current = vec![ScheduledAssignment::new(
            "Spin",
            "Annex",
            Weekday::Monday,
            minute(9, 0),
            60,
            "Mara",
        )];
        // Private and locked make no difference to a full room.
        let proposed = ScheduledAssignment::new(
            "Yoga Flow",
            "Annex",
            Weekday::Monday,
            minute(9, 30),
            60,
            "Priya",
        )
        .private_session()
        .locked();
        let outcome = validator.validate(&current, &proposed, &roster());

        assert!(!outcome.valid);
        assert!(!outcome.overridable);
        assert!(matches!(
            outcome.violation,
            Some(ConstraintViolation::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_near_cap_notice() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        // 660 committed minutes; one more hour lands at 720 of 900,
        // inside the 180-minute advisory band.
        let mut current = Vec::new();
        for day in [Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday] {
            current.push(class("Priya", day, minute(6, 0), 100));
            current.push(class("Priya", day, minute(10, 0), 120));
        }
        let proposed = class("Priya", Weekday::Thursday, minute(9, 0), 60);
        let outcome = validator.validate(&current, &proposed, &roster());

        assert!(outcome.valid);
        assert!(!outcome.overridable);
        assert!(outcome.violation.is_none());
        assert!(outcome.warning.as_deref().is_some_and(|w| w.contains("720")));
    }

    #[test]
    fn test_clean_proposal_passes() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let proposed = class("Priya", Weekday::Monday, minute(9, 0), 60);
        let outcome = validator.validate(&[], &proposed, &roster());

        assert_eq!(outcome, ValidationOutcome::pass());
    }

    #[test]
    fn test_unknown_instructor_is_hard() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let proposed = class("Nobody", Weekday::Monday, minute(9, 0), 60);
        let outcome = validator.validate(&[], &proposed, &roster());

        assert!(!outcome.valid);
        assert!(matches!(
            outcome.violation,
            Some(ConstraintViolation::UnknownInstructor { .. })
        ));
    }

    #[test]
    fn test_restricted_window_spares_private() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let validator = AssignmentValidator::new(ConstraintEngine::new(&config, &locations));

        let public = class("Priya", Weekday::Monday, minute(13, 0), 60);
        let outcome = validator.validate(&[], &public, &roster());
        assert!(!outcome.valid);
        assert!(matches!(
            outcome.violation,
            Some(ConstraintViolation::RestrictedWindow { .. })
        ));

        let private = class("Priya", Weekday::Monday, minute(13, 0), 60).private_session();
        let outcome = validator.validate(&[], &private, &roster());
        assert!(outcome.valid);
    }
}
