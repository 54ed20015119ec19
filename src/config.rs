//! Scheduling configuration.
//!
//! Every hand-curated business rule lives here as plain data: per-day
//! priority and avoid lists, tier whitelists, operating slots, peak and
//! restricted windows, parallelism targets and must-run seeds. The
//! engine reads the tables; swapping studio policy never means touching
//! engine code.
//!
//! Format-list matching follows the location-policy convention:
//! case-insensitive substring, so an entry `"Yoga"` covers
//! `"Hot Yoga"` and `"Yoga Flow"`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{in_any_window, minute, Objective, Weekday};

// ================================
// Seeds and parallelism
// ================================

/// A must-run class committed (locked) before general construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedAssignment {
    /// Class format.
    pub format: String,
    /// Location name.
    pub location: String,
    /// Day of week.
    pub day: Weekday,
    /// Start minute of day.
    pub start_min: i32,
    /// Instructor name.
    pub instructor: String,
    /// Private sessions may start inside the restricted window.
    pub private: bool,
}

impl SeedAssignment {
    /// Creates a public must-run seed.
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
            private: false,
        }
    }

    /// Marks the seed as a private session.
    pub fn private_session(mut self) -> Self {
        self.private = true;
        self
    }
}

/// Per-slot placement targets for one objective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parallelism {
    /// Target parallel classes in peak slots.
    pub peak: usize,
    /// Target parallel classes off peak.
    pub off_peak: usize,
}

impl Parallelism {
    /// Creates a parallelism target pair.
    pub fn new(peak: usize, off_peak: usize) -> Self {
        Self { peak, off_peak }
    }
}

/// Parallelism targets per objective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParallelismTable {
    pub revenue: Parallelism,
    pub attendance: Parallelism,
    pub balanced: Parallelism,
}

impl ParallelismTable {
    /// Targets for an objective.
    pub fn for_objective(&self, objective: Objective) -> Parallelism {
        match objective {
            Objective::Revenue => self.revenue,
            Objective::Attendance => self.attendance,
            Objective::Balanced => self.balanced,
        }
    }
}

impl Default for ParallelismTable {
    fn default() -> Self {
        Self {
            revenue: Parallelism::new(3, 2),
            attendance: Parallelism::new(2, 1),
            balanced: Parallelism::new(2, 2),
        }
    }
}

// ================================
// Schedule configuration
// ================================

/// Full rule set for one construction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Formats below this historical average never become candidates.
    pub min_avg_participants: f64,
    /// Divisor applied to average revenue before objective blending.
    pub revenue_scale: f64,
    /// Per-day formats ranked above every non-priority candidate.
    pub priority_formats: HashMap<Weekday, Vec<String>>,
    /// Per-day formats excluded from candidacy.
    pub avoid_formats: HashMap<Weekday, Vec<String>>,
    /// Formats restricted to senior instructors.
    pub advanced_formats: Vec<String>,
    /// Formats a new-tier instructor may teach.
    pub new_tier_formats: Vec<String>,
    /// Allowed start minutes per day.
    pub operating_slots: HashMap<Weekday, Vec<i32>>,
    /// Half-open start-minute windows counted as peak.
    pub peak_windows: Vec<(i32, i32)>,
    /// Half-open window where public classes may not start.
    pub restricted_window: (i32, i32),
    /// Days the restricted window applies to.
    pub restricted_days: Vec<Weekday>,
    /// Occupancy sub-slot length for capacity accounting.
    pub subslot_min: i32,
    /// Class duration when no per-format override exists.
    pub default_duration_min: i32,
    /// Per-format duration overrides.
    pub format_durations: HashMap<String, i32>,
    /// Daily assignment cap per instructor (minutes).
    pub max_daily_min: i32,
    /// Daily class-count cap per instructor.
    pub max_daily_classes: usize,
    /// Longest allowed run of consecutive classes.
    pub max_consecutive: usize,
    /// Gap at or under this counts as consecutive (minutes).
    pub consecutive_gap_min: i32,
    /// Minimum zero-assignment days per instructor per week.
    pub min_days_off: usize,
    /// Weekly totals inside this margin of the cap draw a warning.
    pub near_cap_margin_min: i32,
    /// Location receiving guaranteed opening classes. `None` disables
    /// the opening phase.
    pub primary_location: Option<String>,
    /// Start minute of the guaranteed opening class.
    pub opening_min: i32,
    /// Days the opening guarantee applies to.
    pub opening_days: Vec<Weekday>,
    /// Per-objective slot parallelism targets.
    pub parallelism: ParallelismTable,
    /// Optional total class caps per day.
    pub day_class_caps: HashMap<Weekday, usize>,
    /// Instructors further than this below their weekly cap enter the
    /// top-up phase (minutes).
    pub topup_margin_min: i32,
    /// How many of an instructor's best formats the top-up phase tries.
    pub specialty_formats: usize,
    /// Relative spread of the prediction jitter factor.
    pub prediction_jitter: f64,
    /// Historical average participants at or above this flags a slot as
    /// a top performer.
    pub top_performer_threshold: f64,
    /// Must-run assignments committed first, locked.
    pub seed_assignments: Vec<SeedAssignment>,
}

impl ScheduleConfig {
    /// Creates the default rule set.
    pub fn new() -> Self {
        let mut operating_slots = HashMap::new();
        for day in Weekday::WEEKDAYS {
            // Hourly starts, 06:00 through 19:00.
            operating_slots.insert(day, (6..20).map(|h| minute(h, 0)).collect());
        }
        for day in [Weekday::Saturday, Weekday::Sunday] {
            operating_slots.insert(day, (8..13).map(|h| minute(h, 0)).collect());
        }

        Self {
            min_avg_participants: 5.0,
            revenue_scale: 100.0,
            priority_formats: HashMap::new(),
            avoid_formats: HashMap::new(),
            advanced_formats: vec!["Advanced".to_string(), "Competition".to_string()],
            new_tier_formats: vec![
                "Yoga".to_string(),
                "Spin".to_string(),
                "Mat".to_string(),
            ],
            operating_slots,
            peak_windows: vec![
                (minute(6, 0), minute(9, 0)),
                (minute(17, 0), minute(20, 0)),
            ],
            restricted_window: (minute(12, 0), minute(16, 0)),
            restricted_days: Weekday::WEEKDAYS.to_vec(),
            subslot_min: 30,
            default_duration_min: 60,
            format_durations: HashMap::new(),
            max_daily_min: 240,
            max_daily_classes: 4,
            max_consecutive: 2,
            consecutive_gap_min: 90,
            min_days_off: 2,
            near_cap_margin_min: 180,
            primary_location: None,
            opening_min: minute(6, 0),
            opening_days: Weekday::WEEKDAYS.to_vec(),
            parallelism: ParallelismTable::default(),
            day_class_caps: HashMap::new(),
            topup_margin_min: 180,
            specialty_formats: 3,
            prediction_jitter: 0.10,
            top_performer_threshold: 12.0,
            seed_assignments: Vec::new(),
        }
    }

    /// Sets the candidate participant threshold.
    pub fn with_min_avg_participants(mut self, min: f64) -> Self {
        self.min_avg_participants = min;
        self
    }

    /// Adds priority formats for a day.
    pub fn with_priority(mut self, day: Weekday, formats: Vec<String>) -> Self {
        self.priority_formats.entry(day).or_default().extend(formats);
        self
    }

    /// Adds avoided formats for a day.
    pub fn with_avoid(mut self, day: Weekday, formats: Vec<String>) -> Self {
        self.avoid_formats.entry(day).or_default().extend(formats);
        self
    }

    /// Replaces the operating slots for a day.
    pub fn with_slots(mut self, day: Weekday, starts: Vec<i32>) -> Self {
        self.operating_slots.insert(day, starts);
        self
    }

    /// Enables the opening guarantee at a location.
    pub fn with_primary_location(mut self, name: impl Into<String>) -> Self {
        self.primary_location = Some(name.into());
        self
    }

    /// Sets the opening minute and days.
    pub fn with_opening(mut self, start_min: i32, days: Vec<Weekday>) -> Self {
        self.opening_min = start_min;
        self.opening_days = days;
        self
    }

    /// Adds a must-run seed.
    pub fn with_seed(mut self, seed: SeedAssignment) -> Self {
        self.seed_assignments.push(seed);
        self
    }

    /// Caps total classes on a day.
    pub fn with_day_cap(mut self, day: Weekday, cap: usize) -> Self {
        self.day_class_caps.insert(day, cap);
        self
    }

    /// Sets a per-format duration override.
    pub fn with_format_duration(mut self, format: impl Into<String>, duration_min: i32) -> Self {
        self.format_durations.insert(format.into(), duration_min);
        self
    }

    /// Sets the prediction jitter spread.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.prediction_jitter = jitter;
        self
    }

    /// Class duration for a format.
    pub fn duration_for(&self, format: &str) -> i32 {
        self.format_durations
            .get(format)
            .copied()
            .unwrap_or(self.default_duration_min)
    }

    /// Whether a start minute falls in a peak window.
    pub fn is_peak(&self, start_min: i32) -> bool {
        in_any_window(start_min, &self.peak_windows)
    }

    /// Whether a public class may not start here.
    pub fn is_restricted(&self, day: Weekday, start_min: i32) -> bool {
        self.restricted_days.contains(&day)
            && start_min >= self.restricted_window.0
            && start_min < self.restricted_window.1
    }

    /// Whether a format is on the day's priority list.
    pub fn is_priority(&self, day: Weekday, format: &str) -> bool {
        self.priority_formats
            .get(&day)
            .is_some_and(|list| matches_any(format, list))
    }

    /// Whether a format is on the day's avoid list.
    pub fn is_avoided(&self, day: Weekday, format: &str) -> bool {
        self.avoid_formats
            .get(&day)
            .is_some_and(|list| matches_any(format, list))
    }

    /// Whether a format requires a senior instructor.
    pub fn is_advanced(&self, format: &str) -> bool {
        matches_any(format, &self.advanced_formats)
    }

    /// Whether a new-tier instructor may teach a format.
    pub fn new_tier_allows(&self, format: &str) -> bool {
        matches_any(format, &self.new_tier_formats)
    }

    /// Operating start minutes for a day (empty when closed).
    pub fn slots_for(&self, day: Weekday) -> &[i32] {
        self.operating_slots
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Slot parallelism target for an objective at a start minute.
    pub fn parallelism_for(&self, objective: Objective, start_min: i32) -> usize {
        let targets = self.parallelism.for_objective(objective);
        if self.is_peak(start_min) {
            targets.peak
        } else {
            targets.off_peak
        }
    }

    /// Total class cap for a day, if configured.
    pub fn day_cap(&self, day: Weekday) -> Option<usize> {
        self.day_class_caps.get(&day).copied()
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive substring membership.
fn matches_any(format: &str, list: &[String]) -> bool {
    let lower = format.to_lowercase();
    list.iter().any(|s| lower.contains(&s.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        let config = ScheduleConfig::new();

        let monday = config.slots_for(Weekday::Monday);
        assert_eq!(monday.first(), Some(&minute(6, 0)));
        assert_eq!(monday.last(), Some(&minute(19, 0)));
        assert_eq!(monday.len(), 14);

        let sunday = config.slots_for(Weekday::Sunday);
        assert_eq!(sunday.len(), 5);
        assert_eq!(sunday.first(), Some(&minute(8, 0)));
    }

    #[test]
    fn test_peak_windows() {
        let config = ScheduleConfig::new();
        assert!(config.is_peak(minute(6, 0)));
        assert!(config.is_peak(minute(8, 59)));
        assert!(!config.is_peak(minute(9, 0)));
        assert!(!config.is_peak(minute(12, 0)));
        assert!(config.is_peak(minute(18, 30)));
    }

    #[test]
    fn test_restricted_window() {
        let config = ScheduleConfig::new();
        assert!(config.is_restricted(Weekday::Monday, minute(12, 0)));
        assert!(config.is_restricted(Weekday::Friday, minute(15, 59)));
        assert!(!config.is_restricted(Weekday::Monday, minute(16, 0)));
        assert!(!config.is_restricted(Weekday::Monday, minute(11, 59)));
        // Weekends exempt by default
        assert!(!config.is_restricted(Weekday::Saturday, minute(13, 0)));
    }

    #[test]
    fn test_priority_and_avoid_lists() {
        let config = ScheduleConfig::new()
            .with_priority(Weekday::Monday, vec!["HIIT".to_string()])
            .with_avoid(Weekday::Sunday, vec!["Aerial".to_string()]);

        assert!(config.is_priority(Weekday::Monday, "HIIT Burn"));
        assert!(!config.is_priority(Weekday::Tuesday, "HIIT Burn"));
        assert!(config.is_avoided(Weekday::Sunday, "Aerial Silk"));
        assert!(!config.is_avoided(Weekday::Saturday, "Aerial Silk"));
    }

    #[test]
    fn test_tier_format_tables() {
        let config = ScheduleConfig::new();
        assert!(config.is_advanced("Advanced Lifting"));
        assert!(!config.is_advanced("Yoga Flow"));
        assert!(config.new_tier_allows("Yoga Flow"));
        assert!(config.new_tier_allows("Spin"));
        assert!(!config.new_tier_allows("HIIT Burn"));
    }

    #[test]
    fn test_durations() {
        let config = ScheduleConfig::new().with_format_duration("Hot Yoga", 75);
        assert_eq!(config.duration_for("Hot Yoga"), 75);
        assert_eq!(config.duration_for("Spin"), 60);
    }

    #[test]
    fn test_parallelism_targets() {
        let config = ScheduleConfig::new();
        // Revenue: 3 peak / 2 off
        assert_eq!(config.parallelism_for(Objective::Revenue, minute(6, 0)), 3);
        assert_eq!(config.parallelism_for(Objective::Revenue, minute(10, 0)), 2);
        // Attendance: 2 peak / 1 off
        assert_eq!(config.parallelism_for(Objective::Attendance, minute(18, 0)), 2);
        assert_eq!(config.parallelism_for(Objective::Attendance, minute(10, 0)), 1);
    }

    #[test]
    fn test_day_caps() {
        let config = ScheduleConfig::new().with_day_cap(Weekday::Sunday, 4);
        assert_eq!(config.day_cap(Weekday::Sunday), Some(4));
        assert_eq!(config.day_cap(Weekday::Monday), None);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ScheduleConfig::new()
            .with_primary_location("Downtown")
            .with_seed(
                SeedAssignment::new(
                    "Hot Yoga",
                    "Hot Room",
                    Weekday::Saturday,
                    minute(9, 0),
                    "Noa",
                )
                .private_session(),
            );

        let json = serde_json::to_string(&config).unwrap();
        let back: ScheduleConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.primary_location.as_deref(), Some("Downtown"));
        assert_eq!(back.seed_assignments.len(), 1);
        assert!(back.seed_assignments[0].private);
        assert_eq!(back.slots_for(Weekday::Monday).len(), 14);
    }
}
