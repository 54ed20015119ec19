//! Schedule quality metrics (KPIs).
//!
//! Computes summary indicators from a built weekly schedule and the
//! instructor roster it was built for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Classes | Number of committed assignments |
//! | Predicted Participants | Sum of per-class participant predictions |
//! | Predicted Revenue | Sum of per-class revenue predictions |
//! | Avg Utilization | Mean of assigned-minutes / tier-cap over the roster |
//! | Classes per Day | Assignment count for each weekday |
//! | Busiest Day | Day with the most assignments |

use std::collections::HashMap;

use crate::models::{Instructor, Weekday, WeeklySchedule};

/// Schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Number of committed assignments.
    pub total_classes: usize,
    /// Sum of predicted participants across the week.
    pub predicted_participants: f64,
    /// Sum of predicted revenue across the week.
    pub predicted_revenue: f64,
    /// Mean instructor utilization (0.0..1.0) over the roster.
    pub avg_utilization: f64,
    /// Per-instructor assigned minutes over tier cap (0.0..1.0).
    pub utilization_by_instructor: HashMap<String, f64>,
    /// Assignment count per weekday, Monday first.
    pub classes_per_day: [usize; 7],
    /// Day with the most assignments; earliest day wins ties.
    pub busiest_day: Option<Weekday>,
    /// Must-run assignments carried over from configuration.
    pub locked_count: usize,
    /// Private sessions.
    pub private_count: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and the roster it was built for.
    pub fn calculate(schedule: &WeeklySchedule, instructors: &[Instructor]) -> Self {
        let mut predicted_participants = 0.0;
        let mut predicted_revenue = 0.0;
        let mut classes_per_day = [0usize; 7];
        let mut locked_count = 0;
        let mut private_count = 0;
        let mut minutes: HashMap<&str, i32> = HashMap::new();

        for a in &schedule.assignments {
            predicted_participants += a.predicted_participants;
            predicted_revenue += a.predicted_revenue;
            classes_per_day[a.day.index()] += 1;
            if a.locked {
                locked_count += 1;
            }
            if a.private {
                private_count += 1;
            }
            *minutes.entry(a.instructor.as_str()).or_insert(0) += a.duration_min;
        }

        let utilization_by_instructor: HashMap<String, f64> = instructors
            .iter()
            .map(|i| {
                let assigned = minutes.get(i.name.as_str()).copied().unwrap_or(0);
                let cap = i.tier.weekly_cap_min();
                (i.name.clone(), f64::from(assigned) / f64::from(cap))
            })
            .collect();
        let avg_utilization = if utilization_by_instructor.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_instructor.values().sum();
            sum / utilization_by_instructor.len() as f64
        };

        let mut busiest_day = None;
        let mut busiest_count = 0;
        for day in Weekday::ALL {
            let count = classes_per_day[day.index()];
            if count > busiest_count {
                busiest_count = count;
                busiest_day = Some(day);
            }
        }

        Self {
            total_classes: schedule.assignment_count(),
            predicted_participants,
            predicted_revenue,
            avg_utilization,
            utilization_by_instructor,
            classes_per_day,
            busiest_day,
            locked_count,
            private_count,
        }
    }

    /// Whether the week meets the given coverage thresholds.
    pub fn meets_coverage(&self, min_classes: usize, min_utilization: f64) -> bool {
        self.total_classes >= min_classes && self.avg_utilization >= min_utilization
    }
}
