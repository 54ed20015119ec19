//! Candidate format ranking.
//!
//! For one (location, day, start) slot the ranker pools the bookable
//! history, filters it against location policy, the day's avoid list and
//! the participant threshold, then scores the surviving formats with the
//! objective blend. Day-priority formats always outrank the rest,
//! whatever their score.

use std::collections::BTreeSet;

use crate::constraints::ConstraintEngine;
use crate::models::{Objective, Weekday};
use crate::stats::{PerformanceIndex, PerformanceStat};

/// One ranked format for a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCandidate {
    /// Format name.
    pub format: String,
    /// Slot averages behind the score.
    pub stats: PerformanceStat,
    /// Objective-blended score.
    pub score: f64,
    /// On the day's priority list.
    pub priority: bool,
}

/// Ranks candidate formats for a slot under one objective.
pub struct CandidateRanker<'a> {
    index: &'a PerformanceIndex,
    engine: &'a ConstraintEngine<'a>,
    objective: Objective,
}

impl<'a> CandidateRanker<'a> {
    /// Creates a ranker.
    pub fn new(
        index: &'a PerformanceIndex,
        engine: &'a ConstraintEngine<'a>,
        objective: Objective,
    ) -> Self {
        Self {
            index,
            engine,
            objective,
        }
    }

    /// All surviving candidates, best first.
    ///
    /// Order: priority band, then score descending, then format name.
    pub fn rank(&self, location: &str, day: Weekday, start_min: i32) -> Vec<FormatCandidate> {
        let config = self.engine.config();

        // Distinct formats with history at the slot, in name order.
        let formats: BTreeSet<&str> = self
            .index
            .records_at(location, day, start_min)
            .iter()
            .map(|r| r.format.as_str())
            .collect();

        let mut candidates = Vec::new();
        for format in formats {
            if self.engine.check_format(format, location).is_err() {
                continue;
            }
            if config.is_avoided(day, format) {
                continue;
            }
            let stats = self.index.stats_for(format, location, day, start_min);
            if stats.avg_participants < config.min_avg_participants {
                continue;
            }
            let score = self.objective.score(
                stats.avg_participants,
                stats.normalized_revenue(config.revenue_scale),
            );
            candidates.push(FormatCandidate {
                format: format.to_string(),
                stats,
                score,
                priority: config.is_priority(day, format),
            });
        }

        candidates.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.format.cmp(&b.format))
        });
        candidates
    }

    /// The best candidate, if any survives filtering.
    pub fn best(&self, location: &str, day: Weekday, start_min: i32) -> Option<FormatCandidate> {
        self.rank(location, day, start_min).into_iter().next()
    }

    /// The best candidate whose format is not already taken at the slot.
    pub fn best_excluding(
        &self,
        location: &str,
        day: Weekday,
        start_min: i32,
        taken: &[String],
    ) -> Option<FormatCandidate> {
        self.rank(location, day, start_min)
            .into_iter()
            .find(|c| !taken.contains(&c.format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;
    use crate::models::{minute, ClassRecord, Location};

    fn records() -> Vec<ClassRecord> {
        let slot = |format: &str, participants: u32, revenue: f64| {
            ClassRecord::new(format, "Downtown", Weekday::Monday, minute(6, 0), "Mara")
                .with_attendance(participants, participants)
                .with_revenue(revenue)
        };
        vec![
            slot("HIIT Burn", 12, 180.0),
            slot("Yoga Flow", 10, 400.0),
            slot("Stretch", 3, 30.0),
            slot("Aerial Silk", 14, 200.0),
        ]
    }

    fn locations() -> Vec<Location> {
        vec![Location::new("Downtown", 2).with_denied("Aerial")]
    }

    #[test]
    fn test_threshold_and_policy_filtering() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records());
        let ranker = CandidateRanker::new(&index, &engine, Objective::Balanced);

        let ranked = ranker.rank("Downtown", Weekday::Monday, minute(6, 0));
        let names: Vec<&str> = ranked.iter().map(|c| c.format.as_str()).collect();

        // Stretch is under the participant threshold, Aerial Silk is
        // denied at Downtown.
        assert!(!names.contains(&"Stretch"));
        assert!(!names.contains(&"Aerial Silk"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_objective_changes_winner() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records());

        // HIIT: 12 participants, 1.8 normalized revenue.
        // Yoga: 10 participants, 4.0 normalized revenue.
        let attendance = CandidateRanker::new(&index, &engine, Objective::Attendance);
        let best = attendance.best("Downtown", Weekday::Monday, minute(6, 0)).unwrap();
        assert_eq!(best.format, "HIIT Burn");

        let revenue = CandidateRanker::new(&index, &engine, Objective::Revenue);
        let best = revenue.best("Downtown", Weekday::Monday, minute(6, 0)).unwrap();
        assert_eq!(best.format, "Yoga Flow");
        assert!((best.score - (0.3 * 10.0 + 0.7 * 4.0)).abs() < 1e-10);
    }

    #[test]
    fn test_avoid_list() {
        let config =
            ScheduleConfig::new().with_avoid(Weekday::Monday, vec!["HIIT".to_string()]);
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records());
        let ranker = CandidateRanker::new(&index, &engine, Objective::Balanced);

        let best = ranker.best("Downtown", Weekday::Monday, minute(6, 0)).unwrap();
        assert_eq!(best.format, "Yoga Flow");
    }

    #[test]
    fn test_priority_outranks_score() {
        // Yoga scores below HIIT on attendance, but Monday prioritizes it.
        let config =
            ScheduleConfig::new().with_priority(Weekday::Monday, vec!["Yoga".to_string()]);
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records());
        let ranker = CandidateRanker::new(&index, &engine, Objective::Attendance);

        let ranked = ranker.rank("Downtown", Weekday::Monday, minute(6, 0));
        assert_eq!(ranked[0].format, "Yoga Flow");
        assert!(ranked[0].priority);
        assert!(ranked[0].score < ranked[1].score);
    }

    #[test]
    fn test_empty_slot_is_none() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records());
        let ranker = CandidateRanker::new(&index, &engine, Objective::Balanced);

        assert!(ranker.best("Downtown", Weekday::Tuesday, minute(6, 0)).is_none());
    }

    #[test]
    fn test_best_excluding() {
        let config = ScheduleConfig::new();
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records());
        let ranker = CandidateRanker::new(&index, &engine, Objective::Attendance);

        let taken = vec!["HIIT Burn".to_string()];
        let best = ranker
            .best_excluding("Downtown", Weekday::Monday, minute(6, 0), &taken)
            .unwrap();
        assert_eq!(best.format, "Yoga Flow");

        let both = vec!["HIIT Burn".to_string(), "Yoga Flow".to_string()];
        assert!(ranker
            .best_excluding("Downtown", Weekday::Monday, minute(6, 0), &both)
            .is_none());
    }

    #[test]
    fn test_tie_broken_by_name() {
        let twin = |format: &str| {
            ClassRecord::new(format, "Downtown", Weekday::Monday, minute(6, 0), "Mara")
                .with_attendance(10, 10)
                .with_revenue(150.0)
        };
        let records = vec![twin("Spin"), twin("Boxfit")];
        let config = ScheduleConfig::new();
        let locations = locations();
        let engine = ConstraintEngine::new(&config, &locations);
        let index = PerformanceIndex::new(&records);
        let ranker = CandidateRanker::new(&index, &engine, Objective::Balanced);

        let ranked = ranker.rank("Downtown", Weekday::Monday, minute(6, 0));
        assert_eq!(ranked[0].format, "Boxfit");
        assert_eq!(ranked[1].format, "Spin");
    }
}
