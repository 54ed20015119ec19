//! Greedy weekly schedule construction.
//!
//! [`ScheduleBuilder`] assembles a week in four strictly ordered,
//! purely additive phases over one shared [`AllocationState`]:
//!
//! 1. **Seeds**: configured must-run classes, committed locked.
//! 2. **Openings**: a guaranteed first class at the primary location.
//! 3. **Fill**: every operating slot in day/location/slot order, up to
//!    the objective's parallelism target of distinct formats per slot.
//! 4. **Top-up**: extra classes in the specialty formats of instructors
//!    still well below their weekly hour target.
//!
//! Nothing backtracks: a committed assignment is never displaced, and a
//! slot that fails its checks is logged, recorded as a [`SlotSkip`] and
//! left empty. Construction is deterministic: the only randomness is
//! the prediction jitter drawn from a seeded generator, and it never
//! influences which classes are placed.
//!
//! # Algorithm
//! Greedy list construction in the dispatching-rule tradition; see
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems".

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ScheduleConfig;
use crate::constraints::ConstraintEngine;
use crate::models::{
    ClassRecord, Instructor, Location, Objective, ScheduledAssignment, SlotSkip, Weekday,
    WeeklySchedule,
};
use crate::scoring::{CandidateRanker, InstructorSelector};
use crate::state::AllocationState;
use crate::stats::{round1, PerformanceIndex};

/// Mutable working set threaded through the construction phases.
struct BuildRun<'a> {
    index: PerformanceIndex,
    engine: ConstraintEngine<'a>,
    state: AllocationState,
    schedule: WeeklySchedule,
    rng: SmallRng,
}

/// Result of one placement attempt at a slot.
enum PlaceOutcome {
    /// Committed an assignment in this format.
    Placed(String),
    /// No format survived the candidate filters.
    NoCandidate { had_history: bool },
    /// Formats were available but nobody could teach them.
    NoInstructor { format: String },
    /// Every room at the slot is already occupied.
    NoRoom,
}

/// Builds one weekly schedule from history, rosters and config.
pub struct ScheduleBuilder<'a> {
    records: &'a [ClassRecord],
    instructors: &'a [Instructor],
    locations: &'a [Location],
    config: &'a ScheduleConfig,
    objective: Objective,
    days: Option<Vec<Weekday>>,
    seed: u64,
}

impl<'a> ScheduleBuilder<'a> {
    /// Creates a builder with the balanced objective and seed 0.
    pub fn new(
        records: &'a [ClassRecord],
        instructors: &'a [Instructor],
        locations: &'a [Location],
        config: &'a ScheduleConfig,
    ) -> Self {
        Self {
            records,
            instructors,
            locations,
            config,
            objective: Objective::default(),
            days: None,
            seed: 0,
        }
    }

    /// Sets the optimization objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Restricts the opening, fill and top-up phases to the given days.
    /// Seed assignments keep their configured days. Unset, the whole
    /// week is built.
    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = Some(days);
        self
    }

    /// Sets the jitter seed. Equal seeds reproduce the week exactly.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs the week. A partial schedule is a valid result;
    /// unfillable slots are recorded in the output's skip list.
    pub fn build(&self) -> WeeklySchedule {
        let mut run = BuildRun {
            index: PerformanceIndex::new(self.records),
            engine: ConstraintEngine::new(self.config, self.locations),
            state: AllocationState::new(self.config.subslot_min),
            schedule: WeeklySchedule::new(),
            rng: SmallRng::seed_from_u64(self.seed),
        };

        let phases: [(&str, fn(&Self, &mut BuildRun<'a>)); 4] = [
            ("seeds", Self::phase_seeds),
            ("openings", Self::phase_openings),
            ("fill", Self::phase_fill),
            ("topup", Self::phase_topup),
        ];
        for (name, phase) in phases {
            phase(self, &mut run);
            debug!(
                "phase {name} done: {} assignments, {} skips",
                run.schedule.assignment_count(),
                run.schedule.skips.len()
            );
        }

        run.schedule.sort_chronological();
        run.schedule
    }

    /// Phase 1: configured must-run classes, committed locked.
    fn phase_seeds(&self, run: &mut BuildRun<'a>) {
        for seed in &self.config.seed_assignments {
            let mut draft = ScheduledAssignment::new(
                &seed.format,
                &seed.location,
                seed.day,
                seed.start_min,
                self.config.duration_for(&seed.format),
                &seed.instructor,
            )
            .locked();
            if seed.private {
                draft = draft.private_session();
            }

            let Some(instructor) = self
                .instructors
                .iter()
                .find(|i| i.name == seed.instructor)
            else {
                warn!("seed rejected: unknown instructor {}", seed.instructor);
                run.schedule.add_skip(SlotSkip::seed_rejected(
                    seed.day,
                    &seed.location,
                    seed.start_min,
                    format!("unknown instructor {}", seed.instructor),
                ));
                continue;
            };

            match run.engine.check_assignment(&run.state, instructor, &draft) {
                Ok(()) => self.commit(run, draft),
                Err(violation) => {
                    warn!("seed rejected: {violation}");
                    run.schedule.add_skip(SlotSkip::seed_rejected(
                        seed.day,
                        &seed.location,
                        seed.start_min,
                        violation.to_string(),
                    ));
                }
            }
        }
    }

    /// Phase 2: guarantee an opening class at the primary location.
    fn phase_openings(&self, run: &mut BuildRun<'a>) {
        let Some(primary) = self.config.primary_location.as_deref() else {
            return;
        };
        if run.engine.location(primary).is_none() {
            warn!("opening phase skipped: unknown primary location {primary}");
            return;
        }
        let start_min = self.config.opening_min;

        for &day in &self.config.opening_days {
            if !self.day_enabled(day) || self.day_cap_reached(run, day) {
                continue;
            }
            if run.engine.check_time(day, start_min, false).is_err() {
                let skip = SlotSkip::restricted(day, primary, start_min);
                warn!("opening not covered: {skip}");
                run.schedule.add_skip(skip);
                continue;
            }
            let occupied =
                run.state.peak_occupancy(primary, day, start_min, self.config.subslot_min) > 0;
            if occupied {
                // A seed already covers the opening minute.
                continue;
            }
            let skip = match self.place_best(run, primary, day, start_min, &[]) {
                PlaceOutcome::Placed(_) | PlaceOutcome::NoRoom => None,
                PlaceOutcome::NoCandidate { .. } => {
                    Some(SlotSkip::no_candidate(day, primary, start_min))
                }
                PlaceOutcome::NoInstructor { format } => {
                    Some(SlotSkip::no_instructor(day, primary, start_min, &format))
                }
            };
            if let Some(skip) = skip {
                warn!("opening not covered: {skip}");
                run.schedule.add_skip(skip);
            }
        }
    }

    /// Phase 3: fill every operating slot toward the parallelism target.
    fn phase_fill(&self, run: &mut BuildRun<'a>) {
        for day in Weekday::ALL {
            if !self.day_enabled(day) {
                continue;
            }
            'locations: for location in self.locations {
                for &start_min in self.config.slots_for(day) {
                    if self.day_cap_reached(run, day) {
                        let cap = self.config.day_cap(day).unwrap_or_default();
                        debug!("day cap {cap} reached on {day}");
                        run.schedule
                            .add_skip(SlotSkip::day_cap(day, &location.name, start_min, cap));
                        break 'locations;
                    }
                    self.fill_slot(run, location, day, start_min);
                }
            }
        }
    }

    fn day_cap_reached(&self, run: &BuildRun<'a>, day: Weekday) -> bool {
        self.config
            .day_cap(day)
            .is_some_and(|cap| run.state.day_total(day) >= cap)
    }

    /// Whether the day is inside the caller's target-day set.
    fn day_enabled(&self, day: Weekday) -> bool {
        self.days.as_deref().is_none_or(|days| days.contains(&day))
    }

    /// Phase 4: top up instructors still well below their weekly cap.
    fn phase_topup(&self, run: &mut BuildRun<'a>) {
        for instructor in self.instructors {
            loop {
                let week_min = run
                    .state
                    .load(&instructor.name)
                    .map_or(0, |load| load.week_min);
                if instructor.tier.weekly_cap_min() - week_min <= self.config.topup_margin_min {
                    break;
                }
                if !self.topup_place_one(run, instructor) {
                    break;
                }
            }
        }
    }

    /// Fills one slot with up to the parallelism target of distinct
    /// formats. Records a skip only when the slot stays empty.
    fn fill_slot(&self, run: &mut BuildRun<'a>, location: &Location, day: Weekday, start_min: i32) {
        if self.config.is_restricted(day, start_min) {
            // Reserved for private sessions; not a failure.
            return;
        }
        let mut target = self
            .config
            .parallelism_for(self.objective, start_min)
            .min(location.capacity as usize);
        if let Some(cap) = self.config.day_cap(day) {
            target = target.min(cap.saturating_sub(run.state.day_total(day)));
        }

        let mut taken: Vec<String> = run
            .schedule
            .assignments_at(&location.name, day)
            .iter()
            .filter(|a| a.start_min == start_min)
            .map(|a| a.format.clone())
            .collect();

        while taken.len() < target {
            match self.place_best(run, &location.name, day, start_min, &taken) {
                PlaceOutcome::Placed(format) => taken.push(format),
                outcome => {
                    if taken.is_empty() {
                        self.record_empty_slot(run, &location.name, day, start_min, outcome);
                    }
                    break;
                }
            }
        }
    }

    /// Ranks formats, selects an instructor and commits one assignment.
    fn place_best(
        &self,
        run: &mut BuildRun<'a>,
        location: &str,
        day: Weekday,
        start_min: i32,
        taken: &[String],
    ) -> PlaceOutcome {
        let mut chosen: Option<ScheduledAssignment> = None;
        let mut blocked_format: Option<String> = None;
        let mut room_full = false;
        {
            let ranker = CandidateRanker::new(&run.index, &run.engine, self.objective);
            let selector = InstructorSelector::new(&run.index, &run.engine);

            for candidate in ranker
                .rank(location, day, start_min)
                .into_iter()
                .filter(|c| !taken.contains(&c.format))
            {
                let draft = ScheduledAssignment::new(
                    &candidate.format,
                    location,
                    day,
                    start_min,
                    self.config.duration_for(&candidate.format),
                    "",
                );
                if run.engine.check_capacity(&run.state, &draft).is_err() {
                    // Rooms exhausted; no other format will fit either.
                    room_full = true;
                    break;
                }
                if let Some(instructor) = selector.select(&run.state, self.instructors, &draft) {
                    chosen = Some(ScheduledAssignment {
                        instructor: instructor.name.clone(),
                        ..draft
                    });
                    break;
                }
                blocked_format.get_or_insert(candidate.format);
            }
        }

        if let Some(assignment) = chosen {
            let format = assignment.format.clone();
            self.commit(run, assignment);
            return PlaceOutcome::Placed(format);
        }
        if room_full {
            return PlaceOutcome::NoRoom;
        }
        match blocked_format {
            Some(format) => PlaceOutcome::NoInstructor { format },
            None => PlaceOutcome::NoCandidate {
                had_history: !run.index.records_at(location, day, start_min).is_empty(),
            },
        }
    }

    /// One top-up placement attempt across the instructor's specialty
    /// formats and every compatible open slot.
    fn topup_place_one(&self, run: &mut BuildRun<'a>, instructor: &Instructor) -> bool {
        let specialties = run
            .index
            .top_formats_for_instructor(&instructor.name, self.config.specialty_formats);

        for format in &specialties {
            let duration = self.config.duration_for(format);
            for day in Weekday::ALL {
                if !self.day_enabled(day) {
                    continue;
                }
                for location in self.locations {
                    for &start_min in self.config.slots_for(day) {
                        if self.config.is_restricted(day, start_min)
                            || self.day_cap_reached(run, day)
                        {
                            continue;
                        }
                        let already_runs = run
                            .schedule
                            .assignments_at(&location.name, day)
                            .iter()
                            .any(|a| a.start_min == start_min && a.format == *format);
                        if already_runs {
                            continue;
                        }
                        let draft = ScheduledAssignment::new(
                            format,
                            &location.name,
                            day,
                            start_min,
                            duration,
                            &instructor.name,
                        );
                        if run
                            .engine
                            .check_assignment(&run.state, instructor, &draft)
                            .is_ok()
                        {
                            self.commit(run, draft);
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Records why a slot stayed empty.
    fn record_empty_slot(
        &self,
        run: &mut BuildRun<'a>,
        location: &str,
        day: Weekday,
        start_min: i32,
        outcome: PlaceOutcome,
    ) {
        let skip = match outcome {
            PlaceOutcome::Placed(_) => return,
            PlaceOutcome::NoRoom => {
                // Seeds already fill the rooms here.
                return;
            }
            PlaceOutcome::NoCandidate { had_history: false } => {
                // No history at all: nothing to schedule, nothing to report.
                debug!("no history at {location} {day} minute {start_min}");
                return;
            }
            PlaceOutcome::NoCandidate { had_history: true } => {
                SlotSkip::no_candidate(day, location, start_min)
            }
            PlaceOutcome::NoInstructor { format } => {
                SlotSkip::no_instructor(day, location, start_min, &format)
            }
        };
        warn!("{skip}");
        run.schedule.add_skip(skip);
    }

    /// Fills predictions and flags, then commits the assignment.
    fn commit(&self, run: &mut BuildRun<'a>, draft: ScheduledAssignment) {
        let stat = run
            .index
            .stats_for(&draft.format, &draft.location, draft.day, draft.start_min);
        let jitter = self.config.prediction_jitter;
        let factor = run.rng.random_range(1.0 - jitter..=1.0 + jitter);

        let mut assignment = draft.with_predictions(
            round1(stat.avg_participants * factor),
            round1(stat.avg_revenue * factor),
        );
        if stat.avg_participants >= self.config.top_performer_threshold {
            assignment = assignment.top_performer();
        }

        debug!(
            "commit {} at {} {} minute {} ({})",
            assignment.format,
            assignment.location,
            assignment.day,
            assignment.start_min,
            assignment.instructor
        );
        run.state.commit(&assignment);
        run.schedule.add_assignment(assignment);
    }
}
