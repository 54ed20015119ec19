//! Constraint checking.
//!
//! [`ConstraintEngine`] owns every feasibility rule as a side-effect-free
//! predicate over the current [`AllocationState`] and a proposed
//! assignment. The builder consults it before each commit; the validator
//! replays the same checks against a schedule snapshot.
//!
//! # Rules
//! - Room capacity per (location, day, sub-slot).
//! - Location format policy (allow/deny substrings).
//! - Restricted midday window for public class starts.
//! - Instructor eligibility: tier whitelist, advanced-format seniority,
//!   one location per day, no personal time overlap, daily minute and
//!   class caps, consecutive-run limit, two days off, weekly hour cap.
//!
//! The weekly hour cap is the only soft rule and is checked last, so a
//! soft overrun only ever surfaces once every hard rule has passed.

use std::collections::HashMap;

use crate::config::ScheduleConfig;
use crate::models::{Instructor, InstructorTier, Location, ScheduledAssignment, Weekday};
use crate::state::{AllocationState, InstructorLoad};

/// A broken scheduling rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstraintViolation {
    /// Proposed location is not in the roster.
    #[error("unknown location {location}")]
    UnknownLocation { location: String },
    /// Proposed instructor is not in the roster.
    #[error("unknown instructor {instructor}")]
    UnknownInstructor { instructor: String },
    /// Every room is taken in some touched sub-slot.
    #[error("no room free at {location} on {day} (minute {start_min}), capacity {capacity}")]
    CapacityExceeded {
        location: String,
        day: Weekday,
        start_min: i32,
        occupied: u32,
        capacity: u32,
    },
    /// The location's format policy rejects the format.
    #[error("format {format} is not allowed at {location}")]
    FormatNotAllowed { format: String, location: String },
    /// Public classes may not start in the restricted window.
    #[error("public classes may not start on {day} at minute {start_min}")]
    RestrictedWindow { day: Weekday, start_min: i32 },
    /// New-tier instructors only teach whitelisted formats.
    #[error("{instructor} (new tier) may not teach {format}")]
    TierWhitelist { instructor: String, format: String },
    /// Advanced formats require a senior instructor.
    #[error("{format} requires a senior instructor; {instructor} is not senior")]
    AdvancedFormat { instructor: String, format: String },
    /// One location per instructor per day.
    #[error("{instructor} already works at {committed} on {day}")]
    LocationConflict {
        instructor: String,
        day: Weekday,
        committed: String,
    },
    /// An instructor cannot teach two classes at once.
    #[error("{instructor} already teaches during minute {start_min} on {day}")]
    TimeConflict {
        instructor: String,
        day: Weekday,
        start_min: i32,
    },
    /// Daily assigned minutes would exceed the cap.
    #[error("{instructor} would reach {minutes} min on {day}, daily limit {limit}")]
    DailyHourLimit {
        instructor: String,
        day: Weekday,
        minutes: i32,
        limit: i32,
    },
    /// Daily class count would exceed the cap.
    #[error("{instructor} already has {limit} classes on {day}")]
    DailyClassLimit {
        instructor: String,
        day: Weekday,
        limit: usize,
    },
    /// Too many back-to-back classes without a break.
    #[error("{instructor} would teach more than {max_run} consecutive classes on {day}")]
    ConsecutiveLimit {
        instructor: String,
        day: Weekday,
        max_run: usize,
    },
    /// Every instructor keeps at least the configured days off.
    #[error("{instructor} must keep {required} days off per week")]
    DayOffLimit { instructor: String, required: usize },
    /// Weekly assigned minutes would exceed the tier cap. Soft.
    #[error("{instructor} would reach {minutes} min this week, cap {cap}")]
    WeeklyHourLimit {
        instructor: String,
        minutes: i32,
        cap: i32,
    },
}

impl ConstraintViolation {
    /// Whether the rule can never be waived.
    pub fn is_hard(&self) -> bool {
        !self.overridable()
    }

    /// Whether a caller may explicitly accept the violation.
    pub fn overridable(&self) -> bool {
        matches!(self, ConstraintViolation::WeeklyHourLimit { .. })
    }
}

/// Side-effect-free rule checks over config, rosters and state.
pub struct ConstraintEngine<'a> {
    config: &'a ScheduleConfig,
    locations: HashMap<&'a str, &'a Location>,
}

impl<'a> ConstraintEngine<'a> {
    /// Creates an engine over a config and location roster.
    pub fn new(config: &'a ScheduleConfig, locations: &'a [Location]) -> Self {
        Self {
            config,
            locations: locations.iter().map(|l| (l.name.as_str(), l)).collect(),
        }
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &ScheduleConfig {
        self.config
    }

    /// Roster lookup.
    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name).copied()
    }

    /// Room capacity over every sub-slot the proposal touches.
    pub fn check_capacity(
        &self,
        state: &AllocationState,
        proposed: &ScheduledAssignment,
    ) -> Result<(), ConstraintViolation> {
        let location = self.location(&proposed.location).ok_or_else(|| {
            ConstraintViolation::UnknownLocation {
                location: proposed.location.clone(),
            }
        })?;
        let occupied = state.peak_occupancy(
            &proposed.location,
            proposed.day,
            proposed.start_min,
            proposed.duration_min,
        );
        if occupied >= location.capacity {
            return Err(ConstraintViolation::CapacityExceeded {
                location: proposed.location.clone(),
                day: proposed.day,
                start_min: proposed.start_min,
                occupied,
                capacity: location.capacity,
            });
        }
        Ok(())
    }

    /// Location format policy.
    pub fn check_format(&self, format: &str, location: &str) -> Result<(), ConstraintViolation> {
        let loc = self
            .location(location)
            .ok_or_else(|| ConstraintViolation::UnknownLocation {
                location: location.to_string(),
            })?;
        if !loc.allows_format(format) {
            return Err(ConstraintViolation::FormatNotAllowed {
                format: format.to_string(),
                location: location.to_string(),
            });
        }
        Ok(())
    }

    /// Restricted-window rule for public starts.
    pub fn check_time(
        &self,
        day: Weekday,
        start_min: i32,
        private: bool,
    ) -> Result<(), ConstraintViolation> {
        if !private && self.config.is_restricted(day, start_min) {
            return Err(ConstraintViolation::RestrictedWindow { day, start_min });
        }
        Ok(())
    }

    /// Full instructor eligibility for a proposal.
    ///
    /// Hard rules run first; the soft weekly cap runs last.
    pub fn check_instructor(
        &self,
        state: &AllocationState,
        instructor: &Instructor,
        proposed: &ScheduledAssignment,
    ) -> Result<(), ConstraintViolation> {
        let fresh = InstructorLoad::default();
        let load = state.load(&instructor.name).unwrap_or(&fresh);
        let day = proposed.day;

        if instructor.tier == InstructorTier::New && !self.config.new_tier_allows(&proposed.format)
        {
            return Err(ConstraintViolation::TierWhitelist {
                instructor: instructor.name.clone(),
                format: proposed.format.clone(),
            });
        }
        if self.config.is_advanced(&proposed.format) && !instructor.is_senior() {
            return Err(ConstraintViolation::AdvancedFormat {
                instructor: instructor.name.clone(),
                format: proposed.format.clone(),
            });
        }
        if let Some(committed) = load.location_on(day) {
            if committed != proposed.location {
                return Err(ConstraintViolation::LocationConflict {
                    instructor: instructor.name.clone(),
                    day,
                    committed: committed.to_string(),
                });
            }
        }
        let end_min = proposed.end_min();
        if load
            .intervals_on(day)
            .iter()
            .any(|&(start, end)| proposed.start_min < end && start < end_min)
        {
            return Err(ConstraintViolation::TimeConflict {
                instructor: instructor.name.clone(),
                day,
                start_min: proposed.start_min,
            });
        }
        let day_minutes = load.day_minutes(day) + proposed.duration_min;
        if day_minutes > self.config.max_daily_min {
            return Err(ConstraintViolation::DailyHourLimit {
                instructor: instructor.name.clone(),
                day,
                minutes: day_minutes,
                limit: self.config.max_daily_min,
            });
        }
        if load.day_class_count(day) >= self.config.max_daily_classes {
            return Err(ConstraintViolation::DailyClassLimit {
                instructor: instructor.name.clone(),
                day,
                limit: self.config.max_daily_classes,
            });
        }
        if self.run_with(load, proposed) > self.config.max_consecutive {
            return Err(ConstraintViolation::ConsecutiveLimit {
                instructor: instructor.name.clone(),
                day,
                max_run: self.config.max_consecutive,
            });
        }
        if !load.works_on(day) && load.worked_days() + 1 > 7 - self.config.min_days_off {
            return Err(ConstraintViolation::DayOffLimit {
                instructor: instructor.name.clone(),
                required: self.config.min_days_off,
            });
        }
        let week_minutes = load.week_min + proposed.duration_min;
        if week_minutes > instructor.tier.weekly_cap_min() {
            return Err(ConstraintViolation::WeeklyHourLimit {
                instructor: instructor.name.clone(),
                minutes: week_minutes,
                cap: instructor.tier.weekly_cap_min(),
            });
        }
        Ok(())
    }

    /// Every rule in order: capacity, format, time, instructor.
    pub fn check_assignment(
        &self,
        state: &AllocationState,
        instructor: &Instructor,
        proposed: &ScheduledAssignment,
    ) -> Result<(), ConstraintViolation> {
        self.check_capacity(state, proposed)?;
        self.check_format(&proposed.format, &proposed.location)?;
        self.check_time(proposed.day, proposed.start_min, proposed.private)?;
        self.check_instructor(state, instructor, proposed)
    }

    /// Longest consecutive run on the proposal's day with it inserted.
    fn run_with(&self, load: &InstructorLoad, proposed: &ScheduledAssignment) -> usize {
        let mut intervals: Vec<(i32, i32)> = load.intervals_on(proposed.day).to_vec();
        intervals.push((proposed.start_min, proposed.end_min()));
        intervals.sort_unstable();

        let gap = self.config.consecutive_gap_min;
        let mut run = 1usize;
        let mut best = 1usize;
        for pair in intervals.windows(2) {
            if pair[1].0 - pair[0].1 <= gap {
                run += 1;
                best = best.max(run);
            } else {
                run = 1;
            }
        }
        best
    }
}
