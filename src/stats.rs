//! Historical performance statistics.
//!
//! [`PerformanceIndex`] folds the class-record history into per-slot
//! averages the ranking and selection stages consume. All queries are
//! pure reads over the indexed set; the same history always yields the
//! same statistics.
//!
//! # Conventions
//! - Hosted (non-bookable) records carry no booking signal and are
//!   dropped at indexing time.
//! - Averages round to one decimal.
//! - An empty match set yields the zero sentinel, never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ClassRecord, Weekday};

/// Rounds to one decimal place.
#[inline]
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregated performance of one (format, location, day, start) key.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PerformanceStat {
    /// Average booked participants, one decimal.
    pub avg_participants: f64,
    /// Average attributed revenue, one decimal.
    pub avg_revenue: f64,
    /// Number of records behind the averages.
    pub sample_count: u32,
}

impl PerformanceStat {
    /// The zero sentinel: no history for the key.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether any history backs this stat.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Average revenue divided by a scale, for objective blending.
    #[inline]
    pub fn normalized_revenue(&self, scale: f64) -> f64 {
        self.avg_revenue / scale
    }

    fn from_records<'a>(records: impl Iterator<Item = &'a ClassRecord>) -> Self {
        let mut participants = 0u64;
        let mut revenue = 0.0;
        let mut count = 0u32;
        for rec in records {
            participants += u64::from(rec.participants);
            revenue += rec.revenue;
            count += 1;
        }
        if count == 0 {
            return Self::zero();
        }
        Self {
            avg_participants: round1(participants as f64 / f64::from(count)),
            avg_revenue: round1(revenue / f64::from(count)),
            sample_count: count,
        }
    }
}

/// Read-only index over the historical record set.
#[derive(Debug, Clone)]
pub struct PerformanceIndex {
    records: Vec<ClassRecord>,
}

impl PerformanceIndex {
    /// Indexes a record slice, dropping hosted sessions.
    pub fn new(records: &[ClassRecord]) -> Self {
        Self {
            records: records.iter().filter(|r| !r.hosted).cloned().collect(),
        }
    }

    /// Number of indexed (bookable) records.
    #[inline]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Averages for a (format, location, day, start) key.
    pub fn stats_for(
        &self,
        format: &str,
        location: &str,
        day: Weekday,
        start_min: i32,
    ) -> PerformanceStat {
        PerformanceStat::from_records(
            self.records
                .iter()
                .filter(|r| r.format == format && r.matches_slot(location, day, start_min)),
        )
    }

    /// Averages for one instructor on a (format, location, day, start) key.
    pub fn stats_for_instructor(
        &self,
        format: &str,
        location: &str,
        day: Weekday,
        start_min: i32,
        instructor: &str,
    ) -> PerformanceStat {
        PerformanceStat::from_records(self.records.iter().filter(|r| {
            r.format == format
                && r.instructor == instructor
                && r.matches_slot(location, day, start_min)
        }))
    }

    /// All bookable records at a (location, day, start) slot.
    pub fn records_at(&self, location: &str, day: Weekday, start_min: i32) -> Vec<&ClassRecord> {
        self.records
            .iter()
            .filter(|r| r.matches_slot(location, day, start_min))
            .collect()
    }

    /// The single best historical instructor for an exact slot key, by
    /// average participants. `None` when nobody taught it or the best
    /// average is shared.
    pub fn best_instructor_for(
        &self,
        format: &str,
        location: &str,
        day: Weekday,
        start_min: i32,
    ) -> Option<String> {
        let mut by_instructor: HashMap<&str, (u64, u32)> = HashMap::new();
        for rec in self.records.iter().filter(|r| {
            r.format == format && r.matches_slot(location, day, start_min)
        }) {
            let entry = by_instructor.entry(rec.instructor.as_str()).or_insert((0, 0));
            entry.0 += u64::from(rec.participants);
            entry.1 += 1;
        }

        let mut best: Option<(&str, f64)> = None;
        let mut tied = false;
        for (name, (sum, count)) in &by_instructor {
            let avg = *sum as f64 / f64::from(*count);
            match best {
                None => best = Some((name, avg)),
                Some((_, best_avg)) if avg > best_avg => {
                    best = Some((name, avg));
                    tied = false;
                }
                Some((_, best_avg)) if (avg - best_avg).abs() < f64::EPSILON => tied = true,
                _ => {}
            }
        }

        match (best, tied) {
            (Some((name, _)), false) => Some(name.to_string()),
            _ => None,
        }
    }

    /// An instructor's strongest formats by their own average
    /// participants, ties broken by format name.
    pub fn top_formats_for_instructor(&self, instructor: &str, limit: usize) -> Vec<String> {
        let mut by_format: HashMap<&str, (u64, u32)> = HashMap::new();
        for rec in self.records.iter().filter(|r| r.instructor == instructor) {
            let entry = by_format.entry(rec.format.as_str()).or_insert((0, 0));
            entry.0 += u64::from(rec.participants);
            entry.1 += 1;
        }

        let mut ranked: Vec<(&str, f64)> = by_format
            .into_iter()
            .map(|(format, (sum, count))| (format, sum as f64 / f64::from(count)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(b.0))
        });
        ranked
            .into_iter()
            .take(limit)
            .map(|(format, _)| format.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::minute;

    fn sample_records() -> Vec<ClassRecord> {
        vec![
            ClassRecord::new("HIIT Burn", "Downtown", Weekday::Monday, minute(6, 0), "Mara")
                .with_attendance(12, 11)
                .with_revenue(180.0),
            ClassRecord::new("HIIT Burn", "Downtown", Weekday::Monday, minute(6, 0), "Mara")
                .with_attendance(10, 9)
                .with_revenue(150.0),
            ClassRecord::new("HIIT Burn", "Downtown", Weekday::Monday, minute(6, 0), "Ivy")
                .with_attendance(8, 8)
                .with_revenue(120.0),
            ClassRecord::new("Yoga Flow", "Downtown", Weekday::Monday, minute(6, 0), "Noa")
                .with_attendance(15, 14)
                .with_revenue(200.0),
            ClassRecord::new("Corporate Event", "Downtown", Weekday::Monday, minute(6, 0), "Sam")
                .with_attendance(40, 40)
                .with_revenue(900.0)
                .hosted(),
        ]
    }

    #[test]
    fn test_stats_rounding() {
        let index = PerformanceIndex::new(&sample_records());
        let stat = index.stats_for("HIIT Burn", "Downtown", Weekday::Monday, minute(6, 0));

        // (12 + 10 + 8) / 3 = 10.0, (180 + 150 + 120) / 3 = 150.0
        assert_eq!(stat.sample_count, 3);
        assert!((stat.avg_participants - 10.0).abs() < 1e-10);
        assert!((stat.avg_revenue - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_one_decimal() {
        let records = vec![
            ClassRecord::new("Spin", "Riverside", Weekday::Tuesday, minute(18, 0), "Ivy")
                .with_attendance(10, 10)
                .with_revenue(100.0),
            ClassRecord::new("Spin", "Riverside", Weekday::Tuesday, minute(18, 0), "Ivy")
                .with_attendance(9, 9)
                .with_revenue(100.1),
            ClassRecord::new("Spin", "Riverside", Weekday::Tuesday, minute(18, 0), "Ivy")
                .with_attendance(9, 8)
                .with_revenue(100.1),
        ];
        let index = PerformanceIndex::new(&records);
        let stat = index.stats_for("Spin", "Riverside", Weekday::Tuesday, minute(18, 0));

        // 28/3 = 9.333.. -> 9.3
        assert!((stat.avg_participants - 9.3).abs() < 1e-10);
        assert!((stat.avg_revenue - 100.1).abs() < 1e-10);
    }

    #[test]
    fn test_hosted_excluded() {
        let index = PerformanceIndex::new(&sample_records());
        assert_eq!(index.record_count(), 4);

        let stat = index.stats_for("Corporate Event", "Downtown", Weekday::Monday, minute(6, 0));
        assert!(stat.is_empty());

        let pool = index.records_at("Downtown", Weekday::Monday, minute(6, 0));
        assert!(pool.iter().all(|r| !r.hosted));
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_zero_sentinel() {
        let index = PerformanceIndex::new(&sample_records());
        let stat = index.stats_for("Pilates Mat", "Riverside", Weekday::Friday, minute(9, 0));

        assert_eq!(stat, PerformanceStat::zero());
        assert!(stat.is_empty());
        assert!((stat.avg_participants).abs() < 1e-10);
    }

    #[test]
    fn test_instructor_stats() {
        let index = PerformanceIndex::new(&sample_records());
        let mara = index.stats_for_instructor(
            "HIIT Burn",
            "Downtown",
            Weekday::Monday,
            minute(6, 0),
            "Mara",
        );
        assert_eq!(mara.sample_count, 2);
        assert!((mara.avg_participants - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_best_instructor() {
        let index = PerformanceIndex::new(&sample_records());
        // Mara averages 11, Ivy averages 8.
        let best = index.best_instructor_for("HIIT Burn", "Downtown", Weekday::Monday, minute(6, 0));
        assert_eq!(best.as_deref(), Some("Mara"));

        // Unknown key -> nobody.
        assert!(index
            .best_instructor_for("HIIT Burn", "Riverside", Weekday::Monday, minute(6, 0))
            .is_none());
    }

    #[test]
    fn test_best_instructor_tie_is_none() {
        let records = vec![
            ClassRecord::new("Spin", "Riverside", Weekday::Tuesday, minute(18, 0), "Ivy")
                .with_attendance(10, 10),
            ClassRecord::new("Spin", "Riverside", Weekday::Tuesday, minute(18, 0), "Kai")
                .with_attendance(10, 9),
        ];
        let index = PerformanceIndex::new(&records);
        assert!(index
            .best_instructor_for("Spin", "Riverside", Weekday::Tuesday, minute(18, 0))
            .is_none());
    }

    #[test]
    fn test_top_formats() {
        let records = vec![
            ClassRecord::new("Spin", "Riverside", Weekday::Tuesday, minute(18, 0), "Ivy")
                .with_attendance(14, 13),
            ClassRecord::new("HIIT Burn", "Downtown", Weekday::Monday, minute(6, 0), "Ivy")
                .with_attendance(9, 9),
            ClassRecord::new("Yoga Flow", "Downtown", Weekday::Sunday, minute(9, 0), "Ivy")
                .with_attendance(11, 10),
        ];
        let index = PerformanceIndex::new(&records);

        let top = index.top_formats_for_instructor("Ivy", 2);
        assert_eq!(top, vec!["Spin".to_string(), "Yoga Flow".to_string()]);

        assert!(index.top_formats_for_instructor("Nobody", 3).is_empty());
    }
}
